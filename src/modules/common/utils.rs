use std::path::PathBuf;

use super::error::UninstallerError;

/// 数据目录、日志目录下使用的子目录名
pub const APP_DIR_NAME: &str = "deb-uninstaller";

/// 覆盖存储目录的环境变量（测试和打包时使用）
pub const STORAGE_DIR_ENV: &str = "DEB_UNINSTALLER_STORAGE_DIR";

/// 获取存储目录，不存在时自动创建
pub fn get_storage_dir() -> Result<PathBuf, UninstallerError> {
    let dir = match std::env::var_os(STORAGE_DIR_ENV) {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => dirs::data_dir()
            .ok_or_else(|| UninstallerError::Other("无法获取数据目录".to_string()))?
            .join(APP_DIR_NAME),
    };
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// 按字符截断字符串，超出部分以 `..` 结尾
pub fn truncate_string(s: &str, max_len: usize) -> String {
    // 使用 char 边界来正确处理 Unicode 字符（包括中文）
    if s.chars().count() > max_len {
        let chars: String = s.chars().take(max_len.saturating_sub(2)).collect();
        format!("{}..", chars)
    } else {
        s.to_string()
    }
}

/// 格式化耗时
pub fn format_duration(millis: i64) -> String {
    if millis >= 60_000 {
        format!("{}m{:02}s", millis / 60_000, (millis % 60_000) / 1000)
    } else if millis >= 1000 {
        format!("{:.1}s", millis as f64 / 1000.0)
    } else {
        format!("{}ms", millis.max(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_string_keeps_short_input() {
        assert_eq!(truncate_string("vim", 10), "vim");
    }

    #[test]
    fn truncate_string_counts_chars_not_bytes() {
        assert_eq!(truncate_string("软件包卸载助手", 5), "软件包..");
        assert_eq!(truncate_string("libreoffice-core", 8), "libreo..");
    }

    #[test]
    fn format_duration_picks_unit() {
        assert_eq!(format_duration(250), "250ms");
        assert_eq!(format_duration(1500), "1.5s");
        assert_eq!(format_duration(125_000), "2m05s");
        assert_eq!(format_duration(-3), "0ms");
    }
}
