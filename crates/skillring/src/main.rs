use skillring::config;
use skillring::sys::host::Host;
use skillring::sys::runtime;

fn main() {
    env_logger::init();

    let config = config::load_or_default();

    let (tx, rx) = async_channel::bounded(32);

    // Start Background Services
    runtime::start_background_services(tx);

    Host::new(&config).run(rx);
}
