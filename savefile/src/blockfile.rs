mod block;
pub mod format;

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;

use log::debug;
use thiserror::Error;

pub use block::Block;
pub use format::{Format, BLOCKFILE_MAGIC, BLOCKFILE_VERSION};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Open an existing file and parse it immediately.
    Read,
    /// Create or truncate. Nothing is written until `save`.
    Write,
    /// Like `Write`, but fail if the file already exists.
    WriteNew,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BlockfileOptions {
    pub format: Format,
}

#[derive(Debug, Error)]
pub enum BlockfileError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("truncated {what} at offset {offset}")]
    Truncated { what: &'static str, offset: usize },
    #[error("block name is missing its NUL terminator")]
    MissingTerminator,
    #[error("block name is not valid utf-8")]
    InvalidUtf8,
    #[error("bad magic {0:#010x}")]
    BadMagic(u32),
    #[error("unsupported format version {0}")]
    UnsupportedVersion(u32),
    #[error("{0} unexpected bytes after the last block")]
    TrailingBytes(usize),
    #[error("block file was opened read-only")]
    NotWritable,
    #[error("length does not fit in 32 bits")]
    TooLarge,
}

pub type Result<T> = std::result::Result<T, BlockfileError>;

/// A save file: named blocks of opaque records, held fully in memory.
///
/// In read mode the whole file is parsed by `open`. In write mode blocks
/// are built up in memory and written in one go by `save`.
pub struct Blockfile {
    file: File,
    mode: Mode,
    options: BlockfileOptions,
    blocks: Vec<Block>,
    /// Index of the block `next_block` returns next.
    cursor: usize,
}

impl Blockfile {
    pub fn open(path: impl AsRef<Path>, mode: Mode) -> Result<Self> {
        Self::open_with(path, mode, BlockfileOptions::default())
    }

    pub fn open_with(
        path: impl AsRef<Path>,
        mode: Mode,
        options: BlockfileOptions,
    ) -> Result<Self> {
        let path = path.as_ref();
        let mut file = match mode {
            Mode::Read => File::open(path)?,
            Mode::Write => OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(path)?,
            Mode::WriteNew => OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(path)?,
        };

        let mut blocks = Vec::new();
        if mode == Mode::Read {
            let mut data = Vec::new();
            file.read_to_end(&mut data)?;
            blocks = format::decode_blocks(&data, options.format)?;
            debug!(
                "opened {} for reading: {} blocks, {} bytes",
                path.display(),
                blocks.len(),
                data.len()
            );
        } else {
            debug!("opened {} for writing ({:?})", path.display(), mode);
        }

        Ok(Self {
            file,
            mode,
            options,
            blocks,
            cursor: 0,
        })
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn options(&self) -> BlockfileOptions {
        self.options
    }

    /// Append an empty block and return it for filling.
    pub fn create_block(&mut self, name: &str) -> &mut Block {
        self.blocks.push(Block::new(name));
        let last = self.blocks.len() - 1;
        &mut self.blocks[last]
    }

    /// First block called `name`. Absence is normal, e.g. an optional
    /// section an older save never wrote.
    pub fn find_block(&mut self, name: &str) -> Option<&mut Block> {
        self.blocks.iter_mut().find(|b| b.name() == name)
    }

    pub fn next_block(&mut self) -> Option<&mut Block> {
        let block = self.blocks.get_mut(self.cursor)?;
        self.cursor += 1;
        Some(block)
    }

    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Write every block to the file, replacing whatever it held.
    pub fn save(&mut self) -> Result<()> {
        if self.mode == Mode::Read {
            return Err(BlockfileError::NotWritable);
        }

        let image = format::encode_blocks(&self.blocks, self.options.format)?;
        self.file.seek(SeekFrom::Start(0))?;
        self.file.write_all(&image)?;
        self.file.set_len(image.len() as u64)?;
        self.file.flush()?;

        debug!(
            "saved {} blocks, {} bytes",
            self.blocks.len(),
            image.len()
        );
        Ok(())
    }

    /// Release the file and every block. Unsaved blocks are discarded.
    pub fn close(self) {}
}
