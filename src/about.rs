pub const PRISM_DISPLAY_VERSION: &str = env!("PRISM_DISPLAY_VERSION");
pub const PRISM_BUILD_N: &str = env!("PRISM_BUILD_N");

pub fn version_cli_text() -> String {
    format!(
        "Prism Groups {}\nBuild {}\nSample group assignment for the csvtoprism companion service",
        PRISM_DISPLAY_VERSION, PRISM_BUILD_N
    )
}
