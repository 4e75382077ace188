use std::ffi::{OsStr, OsString};

/// An extension trait for converting OS strings into regular strings.
///
/// Everything recur accepts on the command line (pattern names, datetimes)
/// is valid UTF-8, so arguments that aren't can be rejected wholesale with
/// a decent error message instead of being threaded through the program as
/// `OsStr`.
pub trait OsStrExt {
    // Named verbosely so that it can't be confused with the standard
    // library's conversions on the implementing types.
    fn as_os_str_slice(&self) -> &OsStr;

    /// Converts this OS string to a string slice.
    fn to_str(&self) -> anyhow::Result<&str> {
        let osstr = self.as_os_str_slice();
        osstr.to_str().ok_or_else(|| {
            anyhow::anyhow!("{osstr:?} is not valid UTF-8")
        })
    }
}

impl OsStrExt for OsStr {
    fn as_os_str_slice(&self) -> &OsStr {
        self
    }
}

impl OsStrExt for OsString {
    fn as_os_str_slice(&self) -> &OsStr {
        self.as_os_str()
    }
}
