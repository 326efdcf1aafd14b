//! # DIB 解析模块
//!
//! ## 设计思路
//!
//! `CF_DIB` 是一整块自描述内存：`头 + (位掩码) + (调色板) + 像素`。
//! 解析分两步：先读头信息还原像素格式与调色板大小，再按偏移解码像素，
//! 得到 `RealizedBitmap`，后续与系统位图走同一条 PNG 编码路径。
//!
//! ## 实现思路
//!
//! - 头部使用 `bytes::Buf` 按小端读取，先做长度校验再读，避免越界 panic。
//! - 像素偏移 = `头长度 + 位掩码字节 + 调色板条目数 × 条目大小`，调色板可为 0 条。
//! - 支持 1/4/8 位调色板、16/24/32 位直接色、`BI_BITFIELDS` 掩码、自上而下/自下而上两种行序，
//!   以及 `BI_PNG` 内嵌 PNG。RLE 与 JPEG 压缩直接报格式错误。
//! - 内嵌 PNG 的尺寸以 PNG 自身为准：解码前读取 IHDR，走同一套资源上限，并要求与头部宽高一致。

use std::io::Cursor;

use bytes::Buf;
use image::{ImageFormat, ImageReader};

use super::source::RealizedBitmap;
use super::{ImageConfig, ImageError};

pub const BI_RGB: u32 = 0;
pub const BI_RLE8: u32 = 1;
pub const BI_RLE4: u32 = 2;
pub const BI_BITFIELDS: u32 = 3;
pub const BI_JPEG: u32 = 4;
pub const BI_PNG: u32 = 5;
pub const BI_ALPHABITFIELDS: u32 = 6;

const CORE_HEADER_SIZE: u32 = 12;
const INFO_HEADER_SIZE: u32 = 40;
/// BITMAPV2INFOHEADER 起头内含 RGB 掩码。
const V2_HEADER_SIZE: u32 = 52;
/// BITMAPV3INFOHEADER 起头内含 Alpha 掩码。
const V3_HEADER_SIZE: u32 = 56;

/// 16 位 BI_RGB 默认按 5-5-5 解释。
const RGB555_MASKS: BitMasks = BitMasks {
    red: 0x7C00,
    green: 0x03E0,
    blue: 0x001F,
    alpha: 0,
};

/// 通道位掩码。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitMasks {
    pub red: u32,
    pub green: u32,
    pub blue: u32,
    pub alpha: u32,
}

/// 解析后的 DIB 头信息。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DibHeader {
    pub header_size: u32,
    pub width: u32,
    pub height: u32,
    pub top_down: bool,
    pub bit_count: u16,
    pub compression: u32,
    pub size_image: u32,
    pub palette_entries: u32,
    /// 调色板单条字节数：`RGBQUAD` 为 4，旧式 `RGBTRIPLE` 为 3。
    pub palette_entry_size: u32,
    /// 紧跟在 40 字节头之后的掩码字节数（仅 `BI_BITFIELDS` 类压缩）。
    pub mask_bytes: u32,
    pub masks: Option<BitMasks>,
}

impl DibHeader {
    /// 从 DIB 数据块读取头信息。
    pub fn parse(block: &[u8]) -> Result<Self, ImageError> {
        if block.is_empty() {
            return Err(ImageError::Empty("DIB 数据块为空".to_string()));
        }
        if block.len() < 4 {
            return Err(ImageError::InvalidFormat(format!(
                "DIB 数据块过短：{} 字节",
                block.len()
            )));
        }

        let header_size = (&block[..4]).get_u32_le();
        if header_size as usize > block.len() {
            return Err(ImageError::InvalidFormat(format!(
                "DIB 头长度超出数据块：{} > {}",
                header_size,
                block.len()
            )));
        }

        let header = match header_size {
            CORE_HEADER_SIZE => Self::parse_core(block)?,
            size if size >= INFO_HEADER_SIZE => Self::parse_info(block, size)?,
            other => {
                return Err(ImageError::InvalidFormat(format!(
                    "不支持的 DIB 头长度：{}",
                    other
                )));
            }
        };

        header.validate()?;
        Ok(header)
    }

    /// BITMAPCOREHEADER：16 位宽高，无压缩字段，调色板为 3 字节 RGBTRIPLE。
    fn parse_core(block: &[u8]) -> Result<Self, ImageError> {
        let mut cursor = &block[4..CORE_HEADER_SIZE as usize];
        let width = cursor.get_u16_le() as u32;
        let height = cursor.get_u16_le() as u32;
        let _planes = cursor.get_u16_le();
        let bit_count = cursor.get_u16_le();

        Ok(Self {
            header_size: CORE_HEADER_SIZE,
            width,
            height,
            top_down: false,
            bit_count,
            compression: BI_RGB,
            size_image: 0,
            palette_entries: default_palette_entries(bit_count),
            palette_entry_size: 3,
            mask_bytes: 0,
            masks: None,
        })
    }

    fn parse_info(block: &[u8], header_size: u32) -> Result<Self, ImageError> {
        let mut cursor = &block[4..INFO_HEADER_SIZE as usize];
        let width = cursor.get_i32_le();
        let height = cursor.get_i32_le();
        let _planes = cursor.get_u16_le();
        let bit_count = cursor.get_u16_le();
        let compression = cursor.get_u32_le();
        let size_image = cursor.get_u32_le();
        cursor.advance(8);
        let clr_used = cursor.get_u32_le();

        if width <= 0 {
            return Err(ImageError::InvalidFormat(format!("DIB 宽度无效：{}", width)));
        }

        let (masks, mask_bytes) = match compression {
            BI_BITFIELDS | BI_ALPHABITFIELDS if header_size >= V2_HEADER_SIZE => {
                let with_alpha = header_size >= V3_HEADER_SIZE;
                (Some(read_masks(&block[INFO_HEADER_SIZE as usize..], with_alpha)), 0)
            }
            BI_BITFIELDS | BI_ALPHABITFIELDS => {
                let count: u32 = if compression == BI_ALPHABITFIELDS { 4 } else { 3 };
                let needed = (INFO_HEADER_SIZE + count * 4) as usize;
                if block.len() < needed {
                    return Err(ImageError::InvalidFormat("DIB 位掩码缺失".to_string()));
                }
                (
                    Some(read_masks(&block[INFO_HEADER_SIZE as usize..], count == 4)),
                    count * 4,
                )
            }
            _ => (None, 0),
        };

        let palette_entries = if clr_used != 0 {
            clr_used
        } else {
            default_palette_entries(bit_count)
        };

        Ok(Self {
            header_size,
            width: width as u32,
            height: height.unsigned_abs(),
            top_down: height < 0,
            bit_count,
            compression,
            size_image,
            palette_entries,
            palette_entry_size: 4,
            mask_bytes,
            masks,
        })
    }

    fn validate(&self) -> Result<(), ImageError> {
        if self.width == 0 || self.height == 0 {
            return Err(ImageError::InvalidFormat(format!(
                "DIB 尺寸无效：{}x{}",
                self.width, self.height
            )));
        }

        let bit_count_ok = match self.compression {
            BI_PNG | BI_JPEG => true,
            _ => matches!(self.bit_count, 1 | 4 | 8 | 16 | 24 | 32),
        };
        if !bit_count_ok {
            return Err(ImageError::InvalidFormat(format!(
                "不支持的 DIB 位深：{}",
                self.bit_count
            )));
        }

        Ok(())
    }

    /// 像素数据在数据块中的起始偏移。
    pub fn pixel_data_offset(&self) -> u64 {
        self.header_size as u64
            + self.mask_bytes as u64
            + self.palette_entries as u64 * self.palette_entry_size as u64
    }

    /// 每行字节数（按 4 字节对齐）。
    pub fn stride(&self) -> u64 {
        (self.width as u64 * self.bit_count as u64).div_ceil(32) * 4
    }

    /// 按头信息解码像素，得到实体化位图。
    ///
    /// 头部尺寸应已由调用方对照 `config` 检查；内嵌 PNG 的真实尺寸在这里另行检查。
    pub fn decode(&self, block: &[u8], config: &ImageConfig) -> Result<RealizedBitmap, ImageError> {
        let offset = usize::try_from(self.pixel_data_offset())
            .ok()
            .filter(|&offset| offset <= block.len())
            .ok_or_else(|| {
                ImageError::InvalidFormat(format!(
                    "调色板超出数据块：偏移 {} > {}",
                    self.pixel_data_offset(),
                    block.len()
                ))
            })?;

        let palette_start = (self.header_size + self.mask_bytes) as usize;
        let pixels = &block[offset..];

        match self.compression {
            BI_PNG => self.decode_embedded_png(pixels, config),
            BI_RGB | BI_BITFIELDS | BI_ALPHABITFIELDS => {
                let palette = read_palette(
                    &block[palette_start..offset],
                    self.palette_entry_size as usize,
                );
                self.decode_uncompressed(pixels, &palette)
            }
            BI_RLE8 | BI_RLE4 | BI_JPEG => Err(ImageError::InvalidFormat(format!(
                "不支持的 DIB 压缩方式：{}",
                self.compression
            ))),
            other => Err(ImageError::InvalidFormat(format!(
                "未知的 DIB 压缩方式：{}",
                other
            ))),
        }
    }

    /// 先读 PNG 自身的 IHDR 尺寸，通过上限检查且与头部一致后才解码。
    fn decode_embedded_png(
        &self,
        bytes: &[u8],
        config: &ImageConfig,
    ) -> Result<RealizedBitmap, ImageError> {
        let (width, height) = ImageReader::with_format(Cursor::new(bytes), ImageFormat::Png)
            .into_dimensions()
            .map_err(|e| ImageError::InvalidFormat(format!("无法读取内嵌 PNG 尺寸：{}", e)))?;

        config.check_resource_limits(width, height)?;
        if (width, height) != (self.width, self.height) {
            return Err(ImageError::InvalidFormat(format!(
                "内嵌 PNG 尺寸 {}x{} 与 DIB 头 {}x{} 不一致",
                width, height, self.width, self.height
            )));
        }

        let decoded = image::load_from_memory_with_format(bytes, ImageFormat::Png)
            .map_err(|e| ImageError::Decode(format!("内嵌 PNG 解码失败：{}", e)))?;
        Ok(RealizedBitmap {
            pixels: decoded.to_rgba8(),
        })
    }

    fn decode_uncompressed(
        &self,
        pixels: &[u8],
        palette: &[[u8; 4]],
    ) -> Result<RealizedBitmap, ImageError> {
        let width = self.width as usize;
        let height = self.height as usize;
        let stride = self.stride() as usize;

        let required = stride
            .checked_mul(height)
            .ok_or_else(|| ImageError::ResourceLimit("DIB 像素数据长度溢出".to_string()))?;
        if pixels.len() < required {
            return Err(ImageError::Decode(format!(
                "像素数据不足：{} < {}",
                pixels.len(),
                required
            )));
        }

        let masks = match (self.bit_count, self.masks) {
            (16 | 32, Some(masks)) => Some(masks),
            (16, None) => Some(RGB555_MASKS),
            _ => None,
        };
        let channels = masks.map(ChannelMasks::new);

        let mut rgba = Vec::with_capacity(width * height * 4);
        for y in 0..height {
            let src_row = if self.top_down { y } else { height - 1 - y };
            let row = &pixels[src_row * stride..(src_row + 1) * stride];

            for x in 0..width {
                let pixel = match (self.bit_count, channels) {
                    (1, _) => lookup(palette, (row[x / 8] >> (7 - x % 8)) & 0x01),
                    (4, _) => {
                        let byte = row[x / 2];
                        lookup(palette, if x % 2 == 0 { byte >> 4 } else { byte & 0x0F })
                    }
                    (8, _) => lookup(palette, row[x]),
                    (16, Some(channels)) => {
                        let value = u16::from_le_bytes([row[x * 2], row[x * 2 + 1]]) as u32;
                        channels.extract(value)
                    }
                    (24, _) => {
                        let i = x * 3;
                        [row[i + 2], row[i + 1], row[i], 0xFF]
                    }
                    (32, Some(channels)) => {
                        let i = x * 4;
                        channels.extract(u32::from_le_bytes([
                            row[i],
                            row[i + 1],
                            row[i + 2],
                            row[i + 3],
                        ]))
                    }
                    (32, None) => {
                        let i = x * 4;
                        [row[i + 2], row[i + 1], row[i], row[i + 3]]
                    }
                    (bits, _) => {
                        return Err(ImageError::InvalidFormat(format!(
                            "不支持的 DIB 位深：{}",
                            bits
                        )));
                    }
                };
                rgba.extend_from_slice(&pixel);
            }
        }

        // GDI 不写 32 位 BI_RGB 的保留字节，全 0 时视为不透明
        if self.bit_count == 32 && self.compression == BI_RGB {
            force_opaque_if_alpha_unused(&mut rgba);
        }

        RealizedBitmap::from_rgba(self.width, self.height, rgba)
            .ok_or_else(|| ImageError::Decode("解码后像素数据长度异常".to_string()))
    }
}

/// 无 `biClrUsed` 时，8 位及以下默认满调色板，其余无调色板。
fn default_palette_entries(bit_count: u16) -> u32 {
    if (1..=8).contains(&bit_count) {
        1 << bit_count
    } else {
        0
    }
}

fn read_masks(mut bytes: &[u8], with_alpha: bool) -> BitMasks {
    let red = bytes.get_u32_le();
    let green = bytes.get_u32_le();
    let blue = bytes.get_u32_le();
    let alpha = if with_alpha { bytes.get_u32_le() } else { 0 };
    BitMasks {
        red,
        green,
        blue,
        alpha,
    }
}

/// 调色板条目按 `B G R (X)` 存储，输出为 RGBA。
fn read_palette(bytes: &[u8], entry_size: usize) -> Vec<[u8; 4]> {
    bytes
        .chunks_exact(entry_size)
        .map(|entry| [entry[2], entry[1], entry[0], 0xFF])
        .collect()
}

fn lookup(palette: &[[u8; 4]], index: u8) -> [u8; 4] {
    palette
        .get(index as usize)
        .copied()
        .unwrap_or([0, 0, 0, 0xFF])
}

fn force_opaque_if_alpha_unused(rgba: &mut [u8]) {
    if rgba.chunks_exact(4).all(|px| px[3] == 0) {
        for px in rgba.chunks_exact_mut(4) {
            px[3] = 0xFF;
        }
    }
}


#[derive(Debug, Clone, Copy)]
struct ChannelMask {
    mask: u32,
    shift: u32,
    max: u32,
}

impl ChannelMask {
    fn new(mask: u32) -> Self {
        if mask == 0 {
            return Self {
                mask: 0,
                shift: 0,
                max: 0,
            };
        }
        let shift = mask.trailing_zeros();
        Self {
            mask,
            shift,
            max: mask >> shift,
        }
    }

    fn extract(self, value: u32, fallback: u8) -> u8 {
        if self.max == 0 {
            return fallback;
        }
        let raw = ((value & self.mask) >> self.shift) as u64;
        let max = self.max as u64;
        ((raw * 255 + max / 2) / max) as u8
    }
}

#[derive(Debug, Clone, Copy)]
struct ChannelMasks {
    red: ChannelMask,
    green: ChannelMask,
    blue: ChannelMask,
    alpha: ChannelMask,
}

impl ChannelMasks {
    fn new(masks: BitMasks) -> Self {
        Self {
            red: ChannelMask::new(masks.red),
            green: ChannelMask::new(masks.green),
            blue: ChannelMask::new(masks.blue),
            alpha: ChannelMask::new(masks.alpha),
        }
    }

    fn extract(self, value: u32) -> [u8; 4] {
        [
            self.red.extract(value, 0),
            self.green.extract(value, 0),
            self.blue.extract(value, 0),
            self.alpha.extract(value, 0xFF),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BufMut;

    fn info_header(width: i32, height: i32, bit_count: u16, compression: u32, clr_used: u32) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.put_u32_le(40);
        buf.put_i32_le(width);
        buf.put_i32_le(height);
        buf.put_u16_le(1);
        buf.put_u16_le(bit_count);
        buf.put_u32_le(compression);
        buf.put_u32_le(0);
        buf.put_i32_le(0);
        buf.put_i32_le(0);
        buf.put_u32_le(clr_used);
        buf.put_u32_le(0);
        buf
    }

    fn png_bytes(width: u32, height: u32, rgba: &[u8]) -> Vec<u8> {
        use image::ImageEncoder;
        use image::codecs::png::PngEncoder;

        let mut png = Vec::new();
        PngEncoder::new(&mut png)
            .write_image(rgba, width, height, image::ExtendedColorType::Rgba8)
            .unwrap();
        png
    }

    fn rgba_at(bitmap: &RealizedBitmap, x: u32, y: u32) -> [u8; 4] {
        bitmap.pixels.get_pixel(x, y).0
    }

    #[test]
    fn palette_offset_skips_entries_times_entry_size() {
        let mut block = info_header(2, 1, 8, BI_RGB, 3);
        // 调色板：蓝、绿、红
        block.put_slice(&[0xFF, 0x00, 0x00, 0x00]);
        block.put_slice(&[0x00, 0xFF, 0x00, 0x00]);
        block.put_slice(&[0x00, 0x00, 0xFF, 0x00]);
        block.put_slice(&[2, 1, 0, 0]);

        let header = DibHeader::parse(&block).unwrap();
        assert_eq!(header.palette_entries, 3);
        assert_eq!(header.pixel_data_offset(), 40 + 3 * 4);

        let bitmap = header.decode(&block, &ImageConfig::default()).unwrap();
        assert_eq!(rgba_at(&bitmap, 0, 0), [0xFF, 0x00, 0x00, 0xFF]);
        assert_eq!(rgba_at(&bitmap, 1, 0), [0x00, 0xFF, 0x00, 0xFF]);
    }

    #[test]
    fn zero_palette_entries_start_pixels_right_after_header() {
        let block = info_header(1, 1, 24, BI_RGB, 0);
        let header = DibHeader::parse(&block).unwrap();
        assert_eq!(header.palette_entries, 0);
        assert_eq!(header.pixel_data_offset(), 40);
    }

    #[test]
    fn eight_bit_without_clr_used_defaults_to_full_palette() {
        let block = info_header(1, 1, 8, BI_RGB, 0);
        let header = DibHeader::parse(&block).unwrap();
        assert_eq!(header.palette_entries, 256);
        assert_eq!(header.pixel_data_offset(), 40 + 256 * 4);
    }

    #[test]
    fn bottom_up_24_bit_rows_are_flipped_and_padded() {
        let mut block = info_header(1, 2, 24, BI_RGB, 0);
        // 自下而上：第一行存的是图像底部
        block.put_slice(&[0x00, 0x00, 0xFF, 0x00]);
        block.put_slice(&[0xFF, 0x00, 0x00, 0x00]);

        let header = DibHeader::parse(&block).unwrap();
        assert_eq!(header.stride(), 4);
        let bitmap = header.decode(&block, &ImageConfig::default()).unwrap();
        assert_eq!(rgba_at(&bitmap, 0, 0), [0x00, 0x00, 0xFF, 0xFF]);
        assert_eq!(rgba_at(&bitmap, 0, 1), [0xFF, 0x00, 0x00, 0xFF]);
    }

    #[test]
    fn top_down_32_bit_with_zero_alpha_becomes_opaque() {
        let mut block = info_header(2, -1, 32, BI_RGB, 0);
        block.put_slice(&[0x10, 0x20, 0x30, 0x00, 0x40, 0x50, 0x60, 0x00]);

        let header = DibHeader::parse(&block).unwrap();
        assert!(header.top_down);
        let bitmap = header.decode(&block, &ImageConfig::default()).unwrap();
        assert_eq!(rgba_at(&bitmap, 0, 0), [0x30, 0x20, 0x10, 0xFF]);
        assert_eq!(rgba_at(&bitmap, 1, 0), [0x60, 0x50, 0x40, 0xFF]);
    }

    #[test]
    fn bitfields_masks_follow_info_header() {
        let mut block = info_header(1, 1, 32, BI_BITFIELDS, 0);
        block.put_u32_le(0x00FF_0000);
        block.put_u32_le(0x0000_FF00);
        block.put_u32_le(0x0000_00FF);
        block.put_u32_le(0x0012_3456);

        let header = DibHeader::parse(&block).unwrap();
        assert_eq!(header.mask_bytes, 12);
        assert_eq!(header.pixel_data_offset(), 52);
        let bitmap = header.decode(&block, &ImageConfig::default()).unwrap();
        assert_eq!(rgba_at(&bitmap, 0, 0), [0x12, 0x34, 0x56, 0xFF]);
    }

    #[test]
    fn sixteen_bit_defaults_to_rgb555() {
        let mut block = info_header(1, 1, 16, BI_RGB, 0);
        block.put_u16_le(0x7C00);
        block.put_u16_le(0);

        let header = DibHeader::parse(&block).unwrap();
        let bitmap = header.decode(&block, &ImageConfig::default()).unwrap();
        assert_eq!(rgba_at(&bitmap, 0, 0), [0xFF, 0x00, 0x00, 0xFF]);
    }

    #[test]
    fn monochrome_bits_index_palette_msb_first() {
        let mut block = info_header(3, 1, 1, BI_RGB, 0);
        block.put_slice(&[0x00, 0x00, 0x00, 0x00]);
        block.put_slice(&[0xFF, 0xFF, 0xFF, 0x00]);
        block.put_slice(&[0b1010_0000, 0, 0, 0]);

        let header = DibHeader::parse(&block).unwrap();
        let bitmap = header.decode(&block, &ImageConfig::default()).unwrap();
        assert_eq!(rgba_at(&bitmap, 0, 0), [0xFF, 0xFF, 0xFF, 0xFF]);
        assert_eq!(rgba_at(&bitmap, 1, 0), [0x00, 0x00, 0x00, 0xFF]);
        assert_eq!(rgba_at(&bitmap, 2, 0), [0xFF, 0xFF, 0xFF, 0xFF]);
    }

    #[test]
    fn core_header_uses_three_byte_palette_entries() {
        let mut block = Vec::new();
        block.put_u32_le(12);
        block.put_u16_le(1);
        block.put_u16_le(1);
        block.put_u16_le(1);
        block.put_u16_le(1);
        block.put_slice(&[0x00, 0x00, 0x00]);
        block.put_slice(&[0x00, 0x00, 0xFF]);
        block.put_slice(&[0x80, 0, 0, 0]);

        let header = DibHeader::parse(&block).unwrap();
        assert_eq!(header.pixel_data_offset(), 12 + 2 * 3);
        let bitmap = header.decode(&block, &ImageConfig::default()).unwrap();
        assert_eq!(rgba_at(&bitmap, 0, 0), [0xFF, 0x00, 0x00, 0xFF]);
    }

    #[test]
    fn truncated_pixels_are_rejected() {
        let mut block = info_header(4, 4, 24, BI_RGB, 0);
        block.put_slice(&[0u8; 10]);
        let header = DibHeader::parse(&block).unwrap();
        assert!(matches!(header.decode(&block, &ImageConfig::default()), Err(ImageError::Decode(_))));
    }

    #[test]
    fn palette_larger_than_block_is_rejected() {
        let block = info_header(1, 1, 8, BI_RGB, 16);
        let header = DibHeader::parse(&block).unwrap();
        assert!(matches!(header.decode(&block, &ImageConfig::default()), Err(ImageError::InvalidFormat(_))));
    }

    #[test]
    fn empty_and_malformed_blocks_are_rejected() {
        assert!(matches!(DibHeader::parse(&[]), Err(ImageError::Empty(_))));
        assert!(DibHeader::parse(&[40, 0]).is_err());
        assert!(DibHeader::parse(&info_header(0, 1, 24, BI_RGB, 0)).is_err());
        assert!(DibHeader::parse(&info_header(1, 1, 7, BI_RGB, 0)).is_err());
    }

    #[test]
    fn rle_compression_is_unsupported() {
        let mut block = info_header(1, 1, 8, BI_RLE8, 1);
        block.put_slice(&[0u8; 8]);
        let header = DibHeader::parse(&block).unwrap();
        assert!(matches!(header.decode(&block, &ImageConfig::default()), Err(ImageError::InvalidFormat(_))));
    }

    #[test]
    fn embedded_png_is_decoded_at_header_size() {
        let rgba = [
            0xFF, 0x00, 0x00, 0xFF, 0x00, 0xFF, 0x00, 0x80, 0x00, 0x00, 0xFF, 0x00, //
            0x10, 0x20, 0x30, 0x40, 0x50, 0x60, 0x70, 0x80, 0x90, 0xA0, 0xB0, 0xC0,
        ];
        let mut block = info_header(3, 2, 0, BI_PNG, 0);
        block.put_slice(&png_bytes(3, 2, &rgba));

        let header = DibHeader::parse(&block).unwrap();
        assert_eq!(header.pixel_data_offset(), 40);

        let bitmap = header.decode(&block, &ImageConfig::default()).unwrap();
        assert_eq!((bitmap.width(), bitmap.height()), (3, 2));
        assert_eq!(bitmap.pixels.as_raw().as_slice(), &rgba[..]);
    }

    #[test]
    fn embedded_png_is_checked_against_its_own_size() {
        let mut block = info_header(1, 1, 0, BI_PNG, 0);
        block.put_slice(&png_bytes(100, 100, &[0u8; 100 * 100 * 4]));
        let header = DibHeader::parse(&block).unwrap();

        let config = ImageConfig {
            max_decoded_pixels: 10,
            ..ImageConfig::default()
        };
        assert!(matches!(
            header.decode(&block, &config),
            Err(ImageError::ResourceLimit(_))
        ));
        assert!(matches!(
            header.decode(&block, &ImageConfig::default()),
            Err(ImageError::InvalidFormat(_))
        ));
    }

    #[test]
    fn garbage_after_png_header_is_rejected() {
        let mut block = info_header(1, 1, 0, BI_PNG, 0);
        block.put_slice(b"not a png");
        let header = DibHeader::parse(&block).unwrap();
        assert!(header.decode(&block, &ImageConfig::default()).is_err());
    }

    #[test]
    fn v5_header_reads_masks_from_inside_header() {
        let mut block = info_header(1, 1, 32, BI_BITFIELDS, 0);
        block[..4].copy_from_slice(&124u32.to_le_bytes());
        block.put_u32_le(0x00FF_0000);
        block.put_u32_le(0x0000_FF00);
        block.put_u32_le(0x0000_00FF);
        block.put_u32_le(0xFF00_0000);
        block.resize(124, 0);
        block.put_u32_le(0x8012_3456);

        let header = DibHeader::parse(&block).unwrap();
        assert_eq!(header.mask_bytes, 0);
        assert_eq!(header.pixel_data_offset(), 124);
        assert_eq!(
            header.masks.map(|m| m.alpha),
            Some(0xFF00_0000)
        );

        let bitmap = header.decode(&block, &ImageConfig::default()).unwrap();
        assert_eq!(rgba_at(&bitmap, 0, 0), [0x12, 0x34, 0x56, 0x80]);
    }
}
