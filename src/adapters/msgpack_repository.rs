//! MessagePack implementation of the value table repository.
//!
//! Each artifact is a single `<dir>/<name>.msgpack` file written with
//! rmp_serde.

use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, ErrorKind, Write},
    path::{Path, PathBuf},
};

use crate::{Result, error::Error, ports::TableRepository, q_learning::SavedValueTable};

/// Directory-backed table repository.
///
/// # Examples
///
/// ```no_run
/// use taxi_agents::{adapters::MsgPackRepository, ports::TableRepository};
///
/// let repo = MsgPackRepository::new("tables");
/// let saved = repo.load("q-learning")?;
/// println!("{} episodes", saved.metadata.episodes_trained);
/// # Ok::<(), taxi_agents::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct MsgPackRepository {
    dir: PathBuf,
}

impl MsgPackRepository {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File that backs the artifact `name`.
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.msgpack"))
    }
}

impl TableRepository for MsgPackRepository {
    fn save(&self, name: &str, saved: &SavedValueTable) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|source| Error::Io {
            operation: format!("create directory {:?}", self.dir),
            source,
        })?;

        let path = self.path_for(name);
        let file = File::create(&path).map_err(|source| Error::Io {
            operation: format!("create file {path:?}"),
            source,
        })?;
        let mut writer = BufWriter::new(file);

        rmp_serde::encode::write(&mut writer, saved).map_err(|e| {
            Error::SerializationContext {
                operation: "serialize value table to MessagePack".to_string(),
                message: e.to_string(),
            }
        })?;
        writer.flush().map_err(|source| Error::Io {
            operation: format!("flush file {path:?}"),
            source,
        })?;

        Ok(())
    }

    fn load(&self, name: &str) -> Result<SavedValueTable> {
        let path = self.path_for(name);
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(source) if source.kind() == ErrorKind::NotFound => {
                return Err(Error::TableNotFound {
                    name: name.to_string(),
                });
            }
            Err(source) => {
                return Err(Error::Io {
                    operation: format!("open file {path:?}"),
                    source,
                });
            }
        };

        let saved: SavedValueTable = rmp_serde::decode::from_read(BufReader::new(file))
            .map_err(|e| Error::SerializationContext {
                operation: "deserialize value table from MessagePack".to_string(),
                message: e.to_string(),
            })?;
        saved.check_version()?;
        Ok(saved)
    }

    fn delete(&self, name: &str) -> Result<()> {
        let path = self.path_for(name);
        fs::remove_file(&path).map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                Error::TableNotFound {
                    name: name.to_string(),
                }
            } else {
                Error::Io {
                    operation: format!("remove file {path:?}"),
                    source,
                }
            }
        })
    }

    fn exists(&self, name: &str) -> bool {
        self.path_for(name).is_file()
    }
}
