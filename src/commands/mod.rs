//! CLI command implementations
//!
//! Every command writes to a caller-supplied `Write` so it can be run against
//! an in-memory system in tests.

pub mod info;
mod list;

pub use list::{list_devices, print_summary};

/// Human-readable size, e.g. `128.0 KiB`
pub(crate) fn format_size(bytes: u64) -> String {
    if bytes >= 1024 * 1024 * 1024 {
        format!("{:.1} GiB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    } else if bytes >= 1024 * 1024 {
        format!("{:.1} MiB", bytes as f64 / (1024.0 * 1024.0))
    } else if bytes >= 1024 {
        format!("{:.1} KiB", bytes as f64 / 1024.0)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(0x20000), "128.0 KiB");
        assert_eq!(format_size(0x180000), "1.5 MiB");
        assert_eq!(format_size(1 << 31), "2.0 GiB");
    }
}
