// Copyright (c) 2018 Jason White
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN
// THE SOFTWARE.

//! The on-disk cache store: `cache_key -> [absolute_output_paths, ...]`,
//! surviving a process restart. Written only by the orchestrator, once per
//! successfully completed rule.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::Error;

#[derive(Default, serde::Serialize, serde::Deserialize)]
struct Entries {
    by_key: HashMap<String, Vec<PathBuf>>,
}

/// A cache store backed by a single file, bincode-serialized behind a
/// leading crate-version string so an incompatible on-disk format triggers
/// a full rebuild rather than a deserialization error.
pub struct Cache {
    entries: Entries,
}

impl Cache {
    /// Starts with an empty cache, unconditionally.
    pub fn new() -> Cache {
        Cache {
            entries: Entries::default(),
        }
    }

    /// Loads the cache from `path`. A missing file is treated as an empty
    /// cache; any other I/O error is propagated.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Cache, Error> {
        match fs::File::open(path.as_ref()) {
            Ok(f) => {
                let mut reader = io::BufReader::new(f);
                Cache::from_reader(&mut reader)
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                Ok(Cache::new())
            }
            Err(err) => Err(err.into()),
        }
    }

    fn from_reader<R: io::Read>(reader: &mut R) -> Result<Cache, Error> {
        let version: String = bincode::deserialize_from(&mut *reader)?;

        if version != env!("CARGO_PKG_VERSION") {
            // Force a full rebuild when the on-disk format is from a
            // different crate version.
            return Ok(Cache::new());
        }

        let entries = bincode::deserialize_from(reader)?;
        Ok(Cache { entries })
    }

    /// Looks up the recorded output paths for `cache_key`.
    pub fn get(&self, cache_key: &str) -> Option<&[PathBuf]> {
        self.entries.by_key.get(cache_key).map(Vec::as_slice)
    }

    /// Records `outputs` under `cache_key`, replacing any prior entry.
    pub fn insert(&mut self, cache_key: String, outputs: Vec<PathBuf>) {
        self.entries.by_key.insert(cache_key, outputs);
    }

    /// Atomically writes the cache to `path` via a temp file + rename.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let path = path.as_ref();
        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir)?;

        let mut tempfile = NamedTempFile::new_in(dir)?;

        {
            let mut writer = io::BufWriter::new(&mut tempfile);
            bincode::serialize_into(&mut writer, env!("CARGO_PKG_VERSION"))?;
            bincode::serialize_into(writer, &self.entries)?;
        }

        tempfile.persist(path)?;
        Ok(())
    }
}

impl Default for Cache {
    fn default() -> Cache {
        Cache::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_an_empty_cache() {
        let dir = tempfile::tempdir().unwrap();
        let cache = Cache::load(dir.path().join("does-not-exist")).unwrap();
        assert!(cache.get("anything").is_none());
    }

    #[test]
    fn round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.bin");

        let mut cache = Cache::new();
        cache.insert(
            "abc123".to_string(),
            vec![PathBuf::from("/out/a"), PathBuf::from("/out/b")],
        );
        cache.save(&path).unwrap();

        let loaded = Cache::load(&path).unwrap();
        assert_eq!(
            loaded.get("abc123"),
            Some(&[PathBuf::from("/out/a"), PathBuf::from("/out/b")][..])
        );
        assert!(loaded.get("nope").is_none());
    }

    #[test]
    fn insert_replaces_existing_entry() {
        let mut cache = Cache::new();
        cache.insert("k".to_string(), vec![PathBuf::from("/out/old")]);
        cache.insert("k".to_string(), vec![PathBuf::from("/out/new")]);
        assert_eq!(cache.get("k"), Some(&[PathBuf::from("/out/new")][..]));
    }
}
