//! # Windows 原生剪贴板后端
//!
//! ## 设计思路
//!
//! 直接调用 Win32 接口，按格式取原始数据块：
//! - `OpenClipboard` / `CloseClipboard`：由 `ClipboardGuard` 配对调用
//! - `GetClipboardData` + `GlobalLock`：返回 `GlobalMemory`，`Drop` 时 `GlobalUnlock`
//! - `CF_BITMAP`：`GetObjectW` 取尺寸，`GetDIBits` 读出 32 位自上而下像素，屏幕 DC 由 `ScreenDc` 守卫释放

use std::ffi::c_void;
use std::mem::size_of;
use std::ops::Deref;

use windows::Win32::Foundation::HGLOBAL;
use windows::Win32::Graphics::Gdi::{
    BITMAP, BITMAPINFO, BITMAPINFOHEADER, DIB_RGB_COLORS, GetDC, GetDIBits, GetObjectW, HBITMAP,
    HDC, ReleaseDC,
};
use windows::Win32::System::DataExchange::{
    CloseClipboard, GetClipboardData, IsClipboardFormatAvailable, OpenClipboard,
};
use windows::Win32::System::Memory::{GlobalLock, GlobalSize, GlobalUnlock};
use windows::Win32::System::Ole::{CF_BITMAP, CF_DIB, CF_TEXT, CF_UNICODETEXT};

use super::{ClipboardBackend, ClipboardError, ClipboardFormat};
use crate::image_handler::DeviceBitmap;

impl ClipboardFormat {
    fn win32_id(self) -> u32 {
        let format = match self {
            Self::Bitmap => CF_BITMAP,
            Self::Dib => CF_DIB,
            Self::UnicodeText => CF_UNICODETEXT,
            Self::Text => CF_TEXT,
        };
        format.0 as u32
    }
}

/// Win32 剪贴板后端。
#[derive(Debug, Default)]
pub struct Win32Clipboard {
    is_open: bool,
}

impl Win32Clipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClipboardBackend for Win32Clipboard {
    type Memory<'a> = GlobalMemory<'a>;

    fn open(&mut self) -> Result<(), ClipboardError> {
        unsafe { OpenClipboard(None) }.map_err(|e| {
            log::warn!("打开剪贴板失败: hr=0x{:08X} detail={:?}", e.code().0 as u32, e);
            ClipboardError::Acquisition
        })?;
        self.is_open = true;
        Ok(())
    }

    fn close(&mut self) {
        if self.is_open {
            if let Err(e) = unsafe { CloseClipboard() } {
                log::warn!("关闭剪贴板失败: hr=0x{:08X}", e.code().0 as u32);
            }
            self.is_open = false;
        }
    }

    fn is_format_available(&self, format: ClipboardFormat) -> bool {
        unsafe { IsClipboardFormatAvailable(format.win32_id()) }.is_ok()
    }

    fn lock_data(&self, format: ClipboardFormat) -> Result<GlobalMemory<'_>, ClipboardError> {
        let handle = unsafe { GetClipboardData(format.win32_id()) }
            .ok()
            .filter(|handle| !handle.is_invalid())
            .ok_or(ClipboardError::FormatUnavailable(format))?;

        let hglobal = HGLOBAL(handle.0);
        let ptr = unsafe { GlobalLock(hglobal) } as *const u8;
        if ptr.is_null() {
            log::warn!("GlobalLock 返回空指针: format={:?}", format);
            return Err(ClipboardError::Lock(format));
        }

        let len = unsafe { GlobalSize(hglobal) };
        // 锁定期间内存不会移动，切片生命周期受守卫约束
        let data = unsafe { std::slice::from_raw_parts(ptr, len) };

        Ok(GlobalMemory {
            handle: hglobal,
            data,
        })
    }

    fn realized_bitmap(&self) -> Result<DeviceBitmap, ClipboardError> {
        let handle = unsafe { GetClipboardData(ClipboardFormat::Bitmap.win32_id()) }
            .ok()
            .filter(|handle| !handle.is_invalid())
            .ok_or(ClipboardError::FormatUnavailable(ClipboardFormat::Bitmap))?;
        let hbitmap = HBITMAP(handle.0);

        let mut info = BITMAP::default();
        let read = unsafe {
            GetObjectW(
                hbitmap.into(),
                size_of::<BITMAP>() as i32,
                Some(&mut info as *mut BITMAP as *mut c_void),
            )
        };
        if read == 0 || info.bmWidth <= 0 || info.bmHeight == 0 {
            return Err(ClipboardError::Graphics("GetObjectW 无法读取位图信息".to_string()));
        }

        let width = info.bmWidth as u32;
        let height = info.bmHeight.unsigned_abs();
        let len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(4))
            .ok_or_else(|| ClipboardError::Graphics("位图尺寸溢出".to_string()))?;

        // 负高度请求自上而下的行序；biCompression 保持 0（BI_RGB）
        let mut bmi = BITMAPINFO {
            bmiHeader: BITMAPINFOHEADER {
                biSize: size_of::<BITMAPINFOHEADER>() as u32,
                biWidth: width as i32,
                biHeight: -(height as i32),
                biPlanes: 1,
                biBitCount: 32,
                ..Default::default()
            },
            ..Default::default()
        };

        let dc = ScreenDc::acquire()?;
        let mut bgra = vec![0u8; len];
        let lines = unsafe {
            GetDIBits(
                dc.0,
                hbitmap,
                0,
                height,
                Some(bgra.as_mut_ptr() as *mut c_void),
                &mut bmi,
                DIB_RGB_COLORS,
            )
        };
        if lines <= 0 {
            return Err(ClipboardError::Graphics(format!(
                "GetDIBits 失败: {}x{}",
                width, height
            )));
        }

        Ok(DeviceBitmap {
            width,
            height,
            bgra,
        })
    }
}

impl Drop for Win32Clipboard {
    fn drop(&mut self) {
        self.close();
    }
}

/// `GlobalLock` 得到的只读视图，`Drop` 时解锁。
pub struct GlobalMemory<'a> {
    handle: HGLOBAL,
    data: &'a [u8],
}

impl Deref for GlobalMemory<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.data
    }
}

impl Drop for GlobalMemory<'_> {
    fn drop(&mut self) {
        // 锁计数归零时会返回 Err(NO_ERROR)，属正常情况
        let _ = unsafe { GlobalUnlock(self.handle) };
    }
}

/// 屏幕 DC 守卫。
struct ScreenDc(HDC);

impl ScreenDc {
    fn acquire() -> Result<Self, ClipboardError> {
        let dc = unsafe { GetDC(None) };
        if dc.is_invalid() {
            return Err(ClipboardError::Graphics("GetDC 失败".to_string()));
        }
        Ok(Self(dc))
    }
}

impl Drop for ScreenDc {
    fn drop(&mut self) {
        unsafe {
            let _ = ReleaseDC(None, self.0);
        }
    }
}
