//! Plain-text report rendering.

use std::ffi::CStr;
use std::io::{self, Write};
use std::os::unix::fs::MetadataExt;
use std::path::Path;

use crate::scanner::ScanReport;

/// Writes the scan report: a summary, the per-file findings, the files to
/// review decorated with permissions and ownership, and the excluded paths.
///
/// # Errors
///
/// Returns an error when writing to the sink fails.
pub fn render(
    out: &mut impl Write,
    reports: &[ScanReport],
    secrets_found: usize,
    excluded: &[String],
) -> io::Result<()> {
    if reports.is_empty() {
        writeln!(out, "[-] No secrets found")?;
    } else {
        writeln!(out, "[+] Found {secrets_found} secrets in {} files", reports.len())?;
        for report in reports {
            writeln!(
                out,
                "[+] Found {} secret(s) in {} file",
                report.secret_count(),
                report.file.display()
            )?;
            for secrets in report.secrets.values() {
                for secret in secrets {
                    writeln!(out, "\tLine: {} {}: {:?}", secret.line, secret.kind, secret.value)?;
                }
            }
        }

        writeln!(out)?;
        writeln!(out)?;
        writeln!(out, "[*] Following files have to be reviewed to determine impact of found secrets")?;
        for report in reports {
            writeln!(out, "\t{}", file_info(&report.file))?;
        }
    }

    if !excluded.is_empty() {
        writeln!(out)?;
        writeln!(out)?;
        writeln!(out, "[*] Following paths were excluded from a scan based on the provided patterns")?;
        for path in excluded {
            writeln!(out, "\t{path}")?;
        }
    }
    Ok(())
}

/// One review line: permission string, owner, group and path.
#[must_use]
pub fn file_info(path: &Path) -> String {
    let Ok(meta) = path.metadata() else {
        return path.display().to_string();
    };
    let perm = format_permissions(meta.mode());
    let owner = user_name(meta.uid()).unwrap_or_else(|| meta.uid().to_string());
    let group = group_name(meta.gid()).unwrap_or_else(|| meta.gid().to_string());
    format!("{perm} {owner:>8} {group:>8} {}", path.display())
}

/// Renders the nine permission characters, including setuid, setgid and
/// sticky the way `ls -l` shows them.
fn format_permissions(mode: u32) -> String {
    let bits: [(u32, char); 9] = [
        (0o400, 'r'),
        (0o200, 'w'),
        (0o100, 'x'),
        (0o040, 'r'),
        (0o020, 'w'),
        (0o010, 'x'),
        (0o004, 'r'),
        (0o002, 'w'),
        (0o001, 'x'),
    ];
    let mut out: Vec<char> = bits
        .iter()
        .map(|(mask, ch)| if mode & mask != 0 { *ch } else { '-' })
        .collect();
    if mode & 0o4000 != 0 {
        out[2] = if out[2] == 'x' { 's' } else { 'S' };
    }
    if mode & 0o2000 != 0 {
        out[5] = if out[5] == 'x' { 's' } else { 'S' };
    }
    if mode & 0o1000 != 0 {
        out[8] = if out[8] == 'x' { 't' } else { 'T' };
    }
    out.into_iter().collect()
}

fn user_name(uid: u32) -> Option<String> {
    // lookups run from the single reporting thread
    unsafe {
        let record = libc::getpwuid(uid);
        if record.is_null() {
            return None;
        }
        CStr::from_ptr((*record).pw_name).to_str().ok().map(str::to_owned)
    }
}

fn group_name(gid: u32) -> Option<String> {
    unsafe {
        let record = libc::getgrgid(gid);
        if record.is_null() {
            return None;
        }
        CStr::from_ptr((*record).gr_name).to_str().ok().map(str::to_owned)
    }
}
