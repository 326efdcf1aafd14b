// In-memory clipboard used by the integration tests.
#![allow(dead_code)]

use std::cell::Cell;
use std::collections::{HashMap, HashSet};
use std::ops::Deref;

use bytes::BufMut;
use clipboard_reader::clipboard::text::encode_wide;
use clipboard_reader::clipboard::{ClipboardBackend, ClipboardError, ClipboardFormat};
use clipboard_reader::image_handler::DeviceBitmap;

#[derive(Default)]
pub struct FakeClipboard {
    payloads: HashMap<ClipboardFormat, Vec<u8>>,
    advertised: HashSet<ClipboardFormat>,
    lock_failures: HashSet<ClipboardFormat>,
    bitmap: Option<DeviceBitmap>,
    pub held_elsewhere: bool,
    pub panic_on_open: bool,
    is_open: bool,
    pub opens: usize,
    pub closes: usize,
    locks: Cell<usize>,
    unlocks: Cell<usize>,
}

impl FakeClipboard {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_unicode_text(mut self, text: &str) -> Self {
        self.payloads
            .insert(ClipboardFormat::UnicodeText, encode_wide(text));
        self
    }

    pub fn with_raw(mut self, format: ClipboardFormat, bytes: Vec<u8>) -> Self {
        self.payloads.insert(format, bytes);
        self
    }

    pub fn with_dib(self, block: Vec<u8>) -> Self {
        self.with_raw(ClipboardFormat::Dib, block)
    }

    pub fn with_bitmap(mut self, bitmap: DeviceBitmap) -> Self {
        self.bitmap = Some(bitmap);
        self
    }

    /// Format reported as present, with no handle behind it.
    pub fn advertising(mut self, format: ClipboardFormat) -> Self {
        self.advertised.insert(format);
        self
    }

    pub fn failing_lock(mut self, format: ClipboardFormat) -> Self {
        self.advertised.insert(format);
        self.lock_failures.insert(format);
        self
    }

    pub fn held_elsewhere(mut self) -> Self {
        self.held_elsewhere = true;
        self
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn locks(&self) -> usize {
        self.locks.get()
    }

    pub fn unlocks(&self) -> usize {
        self.unlocks.get()
    }

    fn assert_open(&self) {
        assert!(self.is_open, "clipboard accessed while closed");
    }
}

pub struct FakeMemory<'a> {
    data: &'a [u8],
    unlocks: &'a Cell<usize>,
}

impl Deref for FakeMemory<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.data
    }
}

impl Drop for FakeMemory<'_> {
    fn drop(&mut self) {
        self.unlocks.set(self.unlocks.get() + 1);
    }
}

impl ClipboardBackend for FakeClipboard {
    type Memory<'a> = FakeMemory<'a>;

    fn open(&mut self) -> Result<(), ClipboardError> {
        self.opens += 1;
        if self.panic_on_open {
            panic!("backend exploded");
        }
        if self.held_elsewhere {
            return Err(ClipboardError::Acquisition);
        }
        assert!(!self.is_open, "clipboard opened twice");
        self.is_open = true;
        Ok(())
    }

    fn close(&mut self) {
        if self.is_open {
            self.closes += 1;
            self.is_open = false;
        }
    }

    fn is_format_available(&self, format: ClipboardFormat) -> bool {
        self.assert_open();
        let has_bitmap = format == ClipboardFormat::Bitmap && self.bitmap.is_some();
        has_bitmap || self.payloads.contains_key(&format) || self.advertised.contains(&format)
    }

    fn lock_data(&self, format: ClipboardFormat) -> Result<FakeMemory<'_>, ClipboardError> {
        self.assert_open();
        if self.lock_failures.contains(&format) {
            return Err(ClipboardError::Lock(format));
        }
        let data = self
            .payloads
            .get(&format)
            .ok_or(ClipboardError::FormatUnavailable(format))?;

        self.locks.set(self.locks.get() + 1);
        Ok(FakeMemory {
            data,
            unlocks: &self.unlocks,
        })
    }

    fn realized_bitmap(&self) -> Result<DeviceBitmap, ClipboardError> {
        self.assert_open();
        self.bitmap
            .clone()
            .ok_or(ClipboardError::FormatUnavailable(ClipboardFormat::Bitmap))
    }
}

/// 32-bpp bottom-up DIB filled with one BGRA colour.
pub fn solid_dib(width: i32, height: i32, bgra: [u8; 4]) -> Vec<u8> {
    let mut block = info_header(width, height, 32, 0);
    for _ in 0..(width * height.abs()) {
        block.put_slice(&bgra);
    }
    block
}

/// BITMAPINFOHEADER with the given bit depth and `biClrUsed`.
pub fn info_header(width: i32, height: i32, bit_count: u16, colors_used: u32) -> Vec<u8> {
    let mut block = Vec::new();
    block.put_u32_le(40);
    block.put_i32_le(width);
    block.put_i32_le(height);
    block.put_u16_le(1);
    block.put_u16_le(bit_count);
    block.put_u32_le(0);
    block.put_u32_le(0);
    block.put_i32_le(0);
    block.put_i32_le(0);
    block.put_u32_le(colors_used);
    block.put_u32_le(0);
    block
}

pub fn decode_png(bytes: &[u8]) -> image::RgbaImage {
    image::load_from_memory_with_format(bytes, image::ImageFormat::Png)
        .unwrap()
        .to_rgba8()
}
