//! Version command implementation.

use clap::Args;

use mgit_core::ios_println;
use mgit_core::iostreams::IOStreams;

/// Show mgit version information.
#[derive(Debug, Args)]
pub struct VersionArgs {}

impl VersionArgs {
    /// Run the version command.
    pub fn run(&self, ios: &IOStreams, version: &str, build_date: &str) {
        ios_println!(ios, "{}", format_version(version, build_date));
    }
}

/// Format version info for display.
pub fn format_version(version: &str, build_date: &str) -> String {
    if build_date.is_empty() {
        format!("mgit version {version}")
    } else {
        format!("mgit version {version} ({build_date})")
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("0.1.0", "", "mgit version 0.1.0")]
    #[case("0.1.0", "2026-01-15", "mgit version 0.1.0 (2026-01-15)")]
    fn test_should_format_version(
        #[case] version: &str,
        #[case] build_date: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(format_version(version, build_date), expected);
    }

    #[test]
    fn test_should_print_version_to_stdout() {
        let (ios, output) = IOStreams::test_with_output();
        VersionArgs {}.run(&ios, "1.2.3", "");
        assert_eq!(output.stdout(), "mgit version 1.2.3\n");
    }
}
