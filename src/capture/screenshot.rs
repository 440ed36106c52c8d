//! Screen region capture with GDI.
//!
//! The scanner reads small fixed boxes, so it copies them straight from the
//! screen DC instead of capturing the whole window.

use anyhow::{anyhow, bail, Result};
use image::RgbImage;
use std::ffi::c_void;

use windows::Win32::Foundation::HWND;
use windows::Win32::Graphics::Gdi::{
    BitBlt, CreateCompatibleBitmap, CreateCompatibleDC, DeleteDC, DeleteObject, GetDC, GetDIBits,
    ReleaseDC, SelectObject, BITMAPINFO, BITMAPINFOHEADER, BI_RGB, DIB_RGB_COLORS, SRCCOPY,
};

use crate::layout::Rect;

/// Copies a screen region (absolute coordinates) into an RGB image.
pub fn capture_region(region: Rect) -> Result<RgbImage> {
    if region.width <= 0 || region.height <= 0 {
        bail!("Cannot capture empty region {:?}", region);
    }
    let (width, height) = (region.width, region.height);

    // 32-bit BGRA, top-down (negative height)
    let mut info = BITMAPINFO {
        bmiHeader: BITMAPINFOHEADER {
            biSize: std::mem::size_of::<BITMAPINFOHEADER>() as u32,
            biWidth: width,
            biHeight: -height,
            biPlanes: 1,
            biBitCount: 32,
            biCompression: BI_RGB.0,
            ..Default::default()
        },
        ..Default::default()
    };
    let mut bgra = vec![0u8; (width * height * 4) as usize];

    let lines = unsafe {
        let screen_dc = GetDC(HWND::default());
        if screen_dc.is_invalid() {
            bail!("GetDC failed");
        }
        let mem_dc = CreateCompatibleDC(screen_dc);
        let bitmap = CreateCompatibleBitmap(screen_dc, width, height);
        let previous = SelectObject(mem_dc, bitmap);

        let blit = BitBlt(
            mem_dc,
            0,
            0,
            width,
            height,
            screen_dc,
            region.left,
            region.top,
            SRCCOPY,
        );
        let lines = if blit.is_ok() {
            GetDIBits(
                mem_dc,
                bitmap,
                0,
                height as u32,
                Some(bgra.as_mut_ptr() as *mut c_void),
                &mut info,
                DIB_RGB_COLORS,
            )
        } else {
            0
        };

        SelectObject(mem_dc, previous);
        let _ = DeleteObject(bitmap);
        let _ = DeleteDC(mem_dc);
        ReleaseDC(HWND::default(), screen_dc);

        blit.map_err(|e| anyhow!("BitBlt failed: {}", e))?;
        lines
    };

    if lines != height {
        bail!("GetDIBits copied {} of {} lines", lines, height);
    }

    let rgb: Vec<u8> = bgra
        .chunks_exact(4)
        .flat_map(|px| [px[2], px[1], px[0]])
        .collect();

    RgbImage::from_raw(width as u32, height as u32, rgb)
        .ok_or_else(|| anyhow!("Captured buffer does not match {}x{}", width, height))
}
