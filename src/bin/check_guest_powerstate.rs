use vsphere_probes::api::VsphereConnector;
use vsphere_probes::cli::{self, GuestPowerCli};
use vsphere_probes::logging::init_tracing;
use vsphere_probes::{report, run_check};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli: GuestPowerCli =
        cli::parse_or_exit(std::env::args_os(), GuestPowerCli::LEGACY_FLAGS);
    let _log_guard = init_tracing(cli.common.log_level);

    let result = run_check(&VsphereConnector::new(), &cli.endpoint(), &cli.probe()).await;
    report::exit(&result)
}
