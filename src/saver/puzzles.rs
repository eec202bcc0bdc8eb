/*
puzzles.rs

Copyright 2025 Hervé Quatremain

This file is part of Zveno.

Zveno is free software: you can redistribute it and/or modify it under the
terms of the GNU General Public License as published by the Free Software
Foundation, either version 3 of the License, or (at your option) any later
version.

Zveno is distributed in the hope that it will be useful, but WITHOUT ANY
WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR
A PARTICULAR PURPOSE. See the GNU General Public License for more details.

You should have received a copy of the GNU General Public License along with
Zveno. If not, see <https://www.gnu.org/licenses/>.

SPDX-License-Identifier: GPL-3.0-or-later
*/

//! Store the generated puzzles.
//!
//! The puzzles are kept in a single JSON file that maps the puzzle IDs to [`PuzzleRecord`]
//! objects.
//! Every operation holds an OS-level lock on a sidecar `.lock` file for its whole
//! read-modify-write cycle, so that concurrent requests never interleave, even from separate
//! processes. The store file is replaced by persisting a uniquely named temporary file from
//! the same directory.

use chrono::{DateTime, Local};
use fd_lock::RwLock;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::error::Error;
use std::fs::{File, OpenOptions, remove_file};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Stored puzzle.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PuzzleRecord {
    /// Puzzle ID.
    pub id: String,

    /// Serialized topology, as sent to the clients.
    pub json: String,

    /// Effective resistance of the puzzle.
    pub answer: f64,

    /// Creation timestamp.
    pub created: DateTime<Local>,
}

/// Error returned when inserting a puzzle with an ID that is already in use.
#[derive(Debug, PartialEq)]
pub struct DuplicateId(pub String);

impl std::fmt::Display for DuplicateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "puzzle {} already exists", self.0)
    }
}

impl Error for DuplicateId {}

/// Object to save and retrieve puzzles.
pub struct SaverPuzzles {
    /// Absolute path to the store file.
    save_file: PathBuf,

    /// Sidecar file that carries the lock.
    lock_file: PathBuf,
}

impl SaverPuzzles {
    /// Create a [`SaverPuzzles`] object.
    ///
    /// The provided [`PathBuf`] is the path to the store file. The file is created by the first
    /// insertion.
    pub fn new(save_file: PathBuf) -> Self {
        let mut lock_file: PathBuf = save_file.clone();
        lock_file.set_extension("lock");
        debug!("Puzzle store file: {save_file:?}  Lock file: {lock_file:?}");
        Self {
            save_file,
            lock_file,
        }
    }

    /// Open the lock file, creating it if needed.
    fn open_lock(&self) -> Result<RwLock<File>, Box<dyn Error>> {
        let file: File = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.lock_file)?;
        Ok(RwLock::new(file))
    }

    /// Retrieve the puzzle with the given ID.
    ///
    /// Return None if the puzzle does not exist.
    pub fn get(&self, id: &str) -> Result<Option<PuzzleRecord>, Box<dyn Error>> {
        let lock: RwLock<File> = self.open_lock()?;
        let _guard = lock.read()?;
        let mut records: HashMap<String, PuzzleRecord> = self.load()?;
        Ok(records.remove(id))
    }

    /// Save a new puzzle.
    ///
    /// # Errors
    ///
    /// The method returns a [`DuplicateId`] error if a puzzle with the same ID already exists,
    /// or the I/O and serialization errors.
    pub fn insert(&self, record: PuzzleRecord) -> Result<(), Box<dyn Error>> {
        let mut lock: RwLock<File> = self.open_lock()?;
        let _guard = lock.write()?;
        let mut records: HashMap<String, PuzzleRecord> = self.load()?;
        if records.contains_key(&record.id) {
            return Err(Box::new(DuplicateId(record.id)));
        }
        debug!("Saving puzzle {}", record.id);
        records.insert(record.id.clone(), record);
        self.store(&records)
    }

    /// Number of stored puzzles.
    pub fn len(&self) -> Result<usize, Box<dyn Error>> {
        let lock: RwLock<File> = self.open_lock()?;
        let _guard = lock.read()?;
        Ok(self.load()?.len())
    }

    /// Whether the store has no puzzle.
    pub fn is_empty(&self) -> Result<bool, Box<dyn Error>> {
        Ok(self.len()? == 0)
    }

    /// Delete the store file.
    pub fn delete_store(&self) {
        let _ = remove_file(&self.save_file);
        let _ = remove_file(&self.lock_file);
    }

    /// Read all the records. A missing file is an empty store.
    fn load(&self) -> Result<HashMap<String, PuzzleRecord>, Box<dyn Error>> {
        let file: File = match File::open(&self.save_file) {
            Ok(f) => f,
            Err(error) => match error.kind() {
                ErrorKind::NotFound => return Ok(HashMap::new()),
                _ => return Err(Box::new(error)),
            },
        };
        let reader: BufReader<File> = BufReader::new(file);
        let records: HashMap<String, PuzzleRecord> = serde_json::from_reader(reader)?;
        Ok(records)
    }

    /// Write all the records. The caller must hold the write lock.
    fn store(&self, records: &HashMap<String, PuzzleRecord>) -> Result<(), Box<dyn Error>> {
        let dir: &Path = match self.save_file.parent() {
            Some(d) if !d.as_os_str().is_empty() => d,
            _ => Path::new("."),
        };
        let tmp_file: NamedTempFile = NamedTempFile::new_in(dir)?;
        {
            let mut writer: BufWriter<&File> = BufWriter::new(tmp_file.as_file());
            serde_json::to_writer(&mut writer, records)?;
            writer.flush()?;
        }
        tmp_file.persist(&self.save_file)?;
        Ok(())
    }
}
