use std::time::Duration;

use super::error::UninstallerError;

/// 卸载流程使用的外部命令及限制
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UninstallConfig {
    /// 根据文件路径查询所属包的程序
    pub resolver_program: String,
    /// 提权程序
    pub elevation_program: String,
    /// 包管理工具
    pub package_tool: String,
    /// 单个阶段的最长执行时间，None 表示不限制
    pub stage_timeout: Option<Duration>,
}

impl Default for UninstallConfig {
    fn default() -> Self {
        Self {
            resolver_program: "dpkg".to_string(),
            elevation_program: "pkexec".to_string(),
            package_tool: "apt".to_string(),
            stage_timeout: None,
        }
    }
}

impl UninstallConfig {
    /// 检查配置是否可用
    pub fn validate(&self) -> Result<(), UninstallerError> {
        for (field, value) in [
            ("resolver_program", &self.resolver_program),
            ("elevation_program", &self.elevation_program),
            ("package_tool", &self.package_tool),
        ] {
            if value.trim().is_empty() {
                return Err(UninstallerError::Config(format!("{} 不能为空", field)));
            }
        }

        if self.stage_timeout == Some(Duration::ZERO) {
            return Err(UninstallerError::Config(
                "stage_timeout 必须大于 0".to_string(),
            ));
        }

        Ok(())
    }

    /// `dpkg -S <path>`
    pub fn resolve_command(&self, path: &str) -> (String, Vec<String>) {
        (
            self.resolver_program.clone(),
            vec!["-S".to_string(), path.to_string()],
        )
    }

    /// `pkexec apt remove --purge -y <package>`
    pub fn remove_command(&self, package: &str) -> (String, Vec<String>) {
        (
            self.elevation_program.clone(),
            vec![
                self.package_tool.clone(),
                "remove".to_string(),
                "--purge".to_string(),
                "-y".to_string(),
                package.to_string(),
            ],
        )
    }

    /// `pkexec apt autoremove -y`
    pub fn autoremove_command(&self) -> (String, Vec<String>) {
        (
            self.elevation_program.clone(),
            vec![
                self.package_tool.clone(),
                "autoremove".to_string(),
                "-y".to_string(),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_commands_match_debian_tooling() {
        let config = UninstallConfig::default();

        assert_eq!(
            config.resolve_command("/usr/bin/foo"),
            ("dpkg".to_string(), vec!["-S".to_string(), "/usr/bin/foo".to_string()])
        );

        let (program, args) = config.remove_command("foopkg");
        assert_eq!(program, "pkexec");
        assert_eq!(args, ["apt", "remove", "--purge", "-y", "foopkg"]);

        let (program, args) = config.autoremove_command();
        assert_eq!(program, "pkexec");
        assert_eq!(args, ["apt", "autoremove", "-y"]);
    }

    #[test]
    fn validate_rejects_blank_programs_and_zero_timeout() {
        assert!(UninstallConfig::default().validate().is_ok());

        let blank = UninstallConfig {
            package_tool: "  ".to_string(),
            ..UninstallConfig::default()
        };
        assert!(matches!(blank.validate(), Err(UninstallerError::Config(_))));

        let zero = UninstallConfig {
            stage_timeout: Some(Duration::ZERO),
            ..UninstallConfig::default()
        };
        assert!(matches!(zero.validate(), Err(UninstallerError::Config(_))));
    }
}
