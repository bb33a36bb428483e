use eframe::{egui, NativeOptions};
use prism_groups::{about, app};
use std::env;

#[cfg(target_os = "macos")]
fn configure_macos_process_name() {
    use objc2_foundation::{ns_string, NSProcessInfo};
    // Winit builds the macOS app menu title from NSProcessInfo::processName.
    // Set it early so the native menu shows "Prism Groups" instead of the
    // binary name.
    unsafe {
        NSProcessInfo::processInfo().setProcessName(ns_string!("Prism Groups"));
    }
}

#[cfg(not(target_os = "macos"))]
fn configure_macos_process_name() {}

fn main() -> eframe::Result<()> {
    configure_macos_process_name();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.iter().any(|a| a == "--version" || a == "-V") {
        println!("{}", about::version_cli_text());
        return Ok(());
    }
    // Optional override for the companion service address, e.g. when it
    // runs on another machine on the local network.
    let gateway_url = args.iter().find(|a| !a.starts_with('-')).cloned();

    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([800.0, 600.0])
            .with_min_inner_size([300.0, 220.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Prism Groups",
        options,
        Box::new(move |_cc| {
            Ok(Box::new(app::PrismGroupsApp::new(
                gateway_url.as_deref(),
            )?))
        }),
    )
}
