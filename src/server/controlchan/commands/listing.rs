//! Renders `Vec<FileInfo>` into the Unix `ls -l`-style lines used by `LIST`.

use crate::vfs::FileInfo;
use chrono::{DateTime, Utc};
use std::time::SystemTime;

/// One `LIST` line: `<mode> 1 <user> <user> <size>  <MMM DD HH:MM> <name>`.
pub fn format_list_line(info: &FileInfo, owner: &str) -> String {
    let mtime: DateTime<Utc> = info.mod_time.unwrap_or(SystemTime::UNIX_EPOCH).into();
    format!(
        "{} 1 {} {} {:>13}  {} {}",
        info.mode.to_ls_string(),
        owner,
        owner,
        info.size,
        mtime.format("%b %e %H:%M"),
        info.name,
    )
}

/// `NLST`: bare names, one per line.
pub fn format_nlst_line(info: &FileInfo) -> String {
    info.name.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vfs::Mode;

    #[test]
    fn renders_zero_time_directory() {
        let info = FileInfo {
            name: "foo".to_string(),
            size: 0,
            mod_time: None,
            mode: Mode::synthesized_dir(),
        };
        assert_eq!(format_list_line(&info, "anonymous"), "drwxr-xr-x 1 anonymous anonymous             0  Jan  1 00:00 foo");
    }

    #[test]
    fn renders_file_with_epoch_time() {
        let info = FileInfo {
            name: "hogehoge.txt".to_string(),
            size: 6,
            mod_time: Some(SystemTime::UNIX_EPOCH),
            mode: Mode::from_bits_truncate(0o644),
        };
        assert_eq!(format_list_line(&info, "anonymous"), "-rw-r--r-- 1 anonymous anonymous             6  Jan  1 00:00 hogehoge.txt");
    }
}
