//! The local list of known bridges.

use std::fs;
use std::io::ErrorKind as IoErrorKind;
use std::path::Path;

use log::debug;

use crate::bridge::Bridge;
use crate::errors::Error;

type Result<T> = std::result::Result<T, Error>;

/// Bridges saved by earlier `discover` and `pair` runs.
///
/// Stored as a JSON array of `{"ip": .., "username": ..}` records. Order is
/// insertion order, and the index of a bridge in that order is how the CLI
/// selects it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BridgeDirectory {
    bridges: Vec<Bridge>,
}

impl BridgeDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the directory file. A missing file is an empty directory.
    pub fn load(path: &Path) -> Result<Self> {
        let data = match fs::read(path) {
            Ok(data) => data,
            Err(err) if err.kind() == IoErrorKind::NotFound => {
                debug!("no bridge directory at {:?}", path);
                return Ok(Self::new());
            }
            Err(err) => {
                return Err(Error::Directory {
                    path: path.to_path_buf(),
                    err,
                });
            }
        };

        let bridges: Vec<Bridge> =
            serde_json::from_slice(&data).map_err(|err| Error::DirectoryFormat {
                path: path.to_path_buf(),
                err,
            })?;
        debug!("loaded {} bridges from {:?}", bridges.len(), path);
        Ok(BridgeDirectory { bridges })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let data = serde_json::to_vec_pretty(&self.bridges).map_err(Error::JsonDump)?;
        fs::write(path, data).map_err(|err| Error::Directory {
            path: path.to_path_buf(),
            err,
        })
    }

    /// Insert a bridge, or update the one with the same address.
    ///
    /// A known bridge keeps its username unless `bridge` brings a new one.
    /// Returns the bridge's index.
    ///
    /// # Examples
    ///
    /// ```
    /// use hue_bridge_rs::{Bridge, BridgeDirectory};
    ///
    /// let mut directory = BridgeDirectory::new();
    /// assert_eq!(directory.add(Bridge::paired("10.0.0.2", "token")), 0);
    /// assert_eq!(directory.add(Bridge::new("10.0.0.2")), 0);
    /// assert_eq!(directory.get(0).unwrap().username(), Some("token"));
    /// assert_eq!(directory.add(Bridge::new("10.0.0.3")), 1);
    /// ```
    pub fn add(&mut self, bridge: Bridge) -> usize {
        match self
            .bridges
            .iter()
            .position(|b| b.address() == bridge.address())
        {
            Some(index) => {
                if bridge.username().is_some() {
                    self.bridges[index] = bridge;
                }
                index
            }
            None => {
                self.bridges.push(bridge);
                self.bridges.len() - 1
            }
        }
    }

    pub fn get(&self, index: usize) -> Option<&Bridge> {
        self.bridges.get(index)
    }

    /// Select a bridge by index, failing with a configuration error.
    pub fn select(&self, index: usize) -> Result<&Bridge> {
        self.get(index)
            .ok_or_else(|| Error::index_out_of_range("bridge", index, self.len()))
    }

    pub fn bridges(&self) -> &[Bridge] {
        &self.bridges
    }

    pub fn len(&self) -> usize {
        self.bridges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bridges.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::ErrorKind;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// A fresh path under the system temp dir; the file is not created.
    pub(crate) fn temp_path(label: &str) -> PathBuf {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        std::env::temp_dir().join(format!(
            "hue-bridge-rs-{}-{}-{}.json",
            label,
            std::process::id(),
            n
        ))
    }

    #[test]
    fn test_missing_file_is_empty() {
        let directory = BridgeDirectory::load(&temp_path("missing")).unwrap();
        assert!(directory.is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let path = temp_path("roundtrip");
        let mut directory = BridgeDirectory::new();
        directory.add(Bridge::paired("10.0.0.2", "token"));
        directory.add(Bridge::new("10.0.0.3"));
        directory.save(&path).unwrap();

        let loaded = BridgeDirectory::load(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(loaded, directory);
    }

    #[test]
    fn test_legacy_file() {
        let path = temp_path("legacy");
        fs::write(
            &path,
            r#"[{"ip": "http://192.168.1.20", "username": "WXb-FX20EDmXTmkRagaWuDMAtz5fKR3SyXKy-FI9"}]"#,
        )
        .unwrap();
        let directory = BridgeDirectory::load(&path).unwrap();
        fs::remove_file(&path).unwrap();

        let bridge = directory.select(0).unwrap();
        assert_eq!(bridge.address(), "http://192.168.1.20");
        assert_eq!(
            bridge.username(),
            Some("WXb-FX20EDmXTmkRagaWuDMAtz5fKR3SyXKy-FI9")
        );
    }

    #[test]
    fn test_malformed_file() {
        let path = temp_path("malformed");
        fs::write(&path, r#"{"ip": "not a list"}"#).unwrap();
        let err = BridgeDirectory::load(&path).unwrap_err();
        fs::remove_file(&path).unwrap();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_select_out_of_range() {
        let mut directory = BridgeDirectory::new();
        directory.add(Bridge::new("10.0.0.2"));
        let err = directory.select(1).unwrap_err();
        assert_eq!(err, Error::index_out_of_range("bridge", 1, 1));
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }
}
