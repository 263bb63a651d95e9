//! 根据 `dpkg -S` 的输出解析文件所属的包

use super::models::PackageName;
use crate::modules::common::error::OperationError;
use crate::modules::runner::ProcessOutput;

/// 解析 `dpkg -S` 输出
///
/// 输出格式: `"package: /path/to/file"`，包名取第一个 `:` 之前的部分并去除首尾空白。
/// 被转移的文件会先输出 `diversion by ...` 行，这些行被跳过。
pub fn parse_dpkg_output(output: &str) -> Result<PackageName, OperationError> {
    let failed = || OperationError::ResolutionFailed {
        output: output.to_string(),
    };

    let line = output
        .lines()
        .find(|line| !line.trim_start().starts_with("diversion by "))
        .ok_or_else(failed)?;
    let (candidate, _) = line.split_once(':').ok_or_else(failed)?;
    PackageName::parse(candidate).map_err(|_| failed())
}

/// 解析阶段结束后的状态转换
pub fn on_name_resolved(output: &ProcessOutput) -> Result<PackageName, OperationError> {
    if let Some(error) = output.as_error() {
        return Err(error);
    }
    parse_dpkg_output(&output.stdout)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_package_before_first_colon() {
        let name = parse_dpkg_output("foopkg: /usr/bin/foo\n").unwrap_or_else(|e| panic!("{}", e));
        assert_eq!(name.as_str(), "foopkg");
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        let name = parse_dpkg_output("  coreutils  : /bin/ls").unwrap_or_else(|e| panic!("{}", e));
        assert_eq!(name.as_str(), "coreutils");
    }

    #[test]
    fn multiarch_output_keeps_name_before_first_colon() {
        let name = parse_dpkg_output("libssl3:amd64: /usr/lib/x86_64-linux-gnu/libssl.so.3")
            .unwrap_or_else(|e| panic!("{}", e));
        assert_eq!(name.as_str(), "libssl3");
    }

    #[test]
    fn output_without_separator_fails() {
        assert_eq!(
            parse_dpkg_output("no path found matching pattern"),
            Err(OperationError::ResolutionFailed {
                output: "no path found matching pattern".to_string()
            })
        );
    }

    #[test]
    fn empty_output_or_empty_name_fails() {
        assert!(matches!(
            parse_dpkg_output(""),
            Err(OperationError::ResolutionFailed { .. })
        ));
        assert!(matches!(
            parse_dpkg_output("   : /usr/bin/foo"),
            Err(OperationError::ResolutionFailed { .. })
        ));
    }

    #[test]
    fn file_shared_by_several_packages_fails() {
        assert!(matches!(
            parse_dpkg_output("pkg-a, pkg-b: /usr/share/doc"),
            Err(OperationError::ResolutionFailed { .. })
        ));
    }

    #[test]
    fn diversion_lines_are_skipped() {
        let output = "diversion by dash from: /bin/sh\n\
                      diversion by dash to: /bin/sh.distrib\n\
                      dash: /bin/sh\n";
        let name = parse_dpkg_output(output).unwrap_or_else(|e| panic!("{}", e));
        assert_eq!(name.as_str(), "dash");
    }

    #[test]
    fn output_with_only_diversion_lines_fails() {
        assert!(matches!(
            parse_dpkg_output("diversion by dash from: /bin/sh\n"),
            Err(OperationError::ResolutionFailed { .. })
        ));
    }

    #[test]
    fn dpkg_failure_is_propagated_before_parsing() {
        let output = ProcessOutput::exited("dpkg", 1, "");
        assert_eq!(
            on_name_resolved(&output),
            Err(OperationError::ProcessExitedNonZero {
                program: "dpkg".to_string(),
                code: 1
            })
        );
    }
}
