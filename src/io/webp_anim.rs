//! Thin owned wrappers over libwebp's animation encoder and decoder.
//!
//! Both sides go through `WebPAnimEncoder` / `WebPAnimDecoder` so that the
//! end timestamp of the last frame is written explicitly and decoded alpha is
//! exactly what libwebp reconstructs.
use std::ffi::CStr;
use std::mem::MaybeUninit;
use std::os::raw::c_int;
use std::ptr::{self, NonNull};

use image::RgbaImage;
use libwebp_sys::{
    WEBP_CSP_MODE, WebPAnimDecoder, WebPAnimDecoderDelete, WebPAnimDecoderGetInfo,
    WebPAnimDecoderGetNext, WebPAnimDecoderHasMoreFrames, WebPAnimDecoderNewInternal,
    WebPAnimDecoderOptions, WebPAnimDecoderOptionsInitInternal, WebPAnimEncoder,
    WebPAnimEncoderAdd, WebPAnimEncoderAssemble, WebPAnimEncoderDelete, WebPAnimEncoderGetError,
    WebPAnimEncoderNewInternal, WebPAnimEncoderOptions, WebPAnimEncoderOptionsInitInternal,
    WebPAnimInfo, WebPConfig, WebPData, WebPDataClear, WebPGetDemuxABIVersion,
    WebPGetMuxABIVersion, WebPPicture, WebPPictureFree, WebPPictureImportRGBA,
};

use crate::error::{Error, Result};
use crate::types::OutputFormat;

fn encode_error(message: impl std::fmt::Display) -> Error {
    Error::encode(OutputFormat::WebP, message)
}

fn to_c_int(value: u32, what: &str) -> Result<c_int> {
    c_int::try_from(value).map_err(|_| encode_error(format!("{} {} out of range", what, value)))
}

/// Owned `WebPAnimEncoder`; deleted on drop.
pub struct AnimationEncoder {
    raw: NonNull<WebPAnimEncoder>,
    width: u32,
    height: u32,
}

impl AnimationEncoder {
    /// Encoder for a `width` x `height` canvas with a transparent background.
    /// `loop_count` 0 loops forever.
    pub fn new(width: u32, height: u32, loop_count: i32) -> Result<Self> {
        let mut options = MaybeUninit::<WebPAnimEncoderOptions>::uninit();
        // SAFETY: the init call fills every field of `options` before it is read.
        let mut options = unsafe {
            if WebPAnimEncoderOptionsInitInternal(options.as_mut_ptr(), WebPGetMuxABIVersion()) == 0
            {
                return Err(encode_error("libwebp mux ABI version mismatch"));
            }
            options.assume_init()
        };
        options.anim_params.loop_count = loop_count;
        options.anim_params.bgcolor = 0;

        let (w, h) = (to_c_int(width, "width")?, to_c_int(height, "height")?);
        // SAFETY: `options` is initialised and outlives the call.
        let raw = unsafe { WebPAnimEncoderNewInternal(w, h, &options, WebPGetMuxABIVersion()) };
        let raw = NonNull::new(raw)
            .ok_or_else(|| encode_error(format!("cannot create a {}x{} encoder", width, height)))?;
        Ok(Self { raw, width, height })
    }

    fn last_error(&self) -> String {
        // SAFETY: libwebp returns a static or encoder-owned NUL-terminated string.
        unsafe {
            let message = WebPAnimEncoderGetError(self.raw.as_ptr());
            if message.is_null() {
                "unknown error".to_string()
            } else {
                CStr::from_ptr(message).to_string_lossy().into_owned()
            }
        }
    }

    /// Add one full-canvas frame shown from `timestamp_ms`.
    pub fn add_frame(
        &mut self,
        image: &RgbaImage,
        timestamp_ms: i32,
        config: &WebPConfig,
    ) -> Result<()> {
        if image.dimensions() != (self.width, self.height) {
            let (fw, fh) = image.dimensions();
            return Err(encode_error(format!(
                "frame size {}x{} differs from canvas {}x{}",
                fw, fh, self.width, self.height
            )));
        }

        let mut picture = Picture::new(image)?;
        // SAFETY: the encoder copies the picture; `picture` and `config` are valid here.
        let ok = unsafe {
            WebPAnimEncoderAdd(self.raw.as_ptr(), &mut picture.0, timestamp_ms, config)
        };
        if ok == 0 {
            return Err(encode_error(self.last_error()));
        }
        Ok(())
    }

    /// Close the animation at `end_timestamp_ms` and return the file bytes.
    ///
    /// The end timestamp sets how long the last frame is shown.
    pub fn finish(self, end_timestamp_ms: i32) -> Result<Vec<u8>> {
        // SAFETY: a null picture marks the end of input; no config is read.
        let ok = unsafe {
            WebPAnimEncoderAdd(self.raw.as_ptr(), ptr::null_mut(), end_timestamp_ms, ptr::null())
        };
        if ok == 0 {
            return Err(encode_error(self.last_error()));
        }

        let mut data = WebPData {
            bytes: ptr::null(),
            size: 0,
        };
        // SAFETY: on success `data` points at a libwebp allocation that we copy
        // and then release with `WebPDataClear`.
        unsafe {
            if WebPAnimEncoderAssemble(self.raw.as_ptr(), &mut data) == 0 {
                return Err(encode_error(self.last_error()));
            }
            let bytes = std::slice::from_raw_parts(data.bytes, data.size).to_vec();
            WebPDataClear(&mut data);
            Ok(bytes)
        }
    }
}

impl Drop for AnimationEncoder {
    fn drop(&mut self) {
        // SAFETY: `raw` came from `WebPAnimEncoderNewInternal` and is deleted once.
        unsafe { WebPAnimEncoderDelete(self.raw.as_ptr()) }
    }
}

/// ARGB picture imported from an RGBA buffer; freed on drop.
struct Picture(WebPPicture);

impl Picture {
    fn new(image: &RgbaImage) -> Result<Self> {
        let mut picture =
            WebPPicture::new().map_err(|_| encode_error("libwebp picture init failed"))?;
        picture.use_argb = 1;
        picture.width = to_c_int(image.width(), "width")?;
        picture.height = to_c_int(image.height(), "height")?;
        let stride = to_c_int(image.width().saturating_mul(4), "stride")?;

        // SAFETY: `image` holds width * height RGBA pixels laid out with `stride`.
        if unsafe { WebPPictureImportRGBA(&mut picture, image.as_raw().as_ptr(), stride) } == 0 {
            // SAFETY: freeing a picture whose import failed is allowed.
            unsafe { WebPPictureFree(&mut picture) };
            return Err(encode_error("out of memory importing frame"));
        }
        Ok(Self(picture))
    }
}

impl Drop for Picture {
    fn drop(&mut self) {
        // SAFETY: the picture was successfully imported and is freed once.
        unsafe { WebPPictureFree(&mut self.0) }
    }
}

/// Owned `WebPAnimDecoder`; deleted on drop.
struct AnimationDecoder(NonNull<WebPAnimDecoder>);

impl Drop for AnimationDecoder {
    fn drop(&mut self) {
        // SAFETY: created by `WebPAnimDecoderNewInternal`, deleted once.
        unsafe { WebPAnimDecoderDelete(self.0.as_ptr()) }
    }
}

/// Decode an animated WebP into fully composited RGBA canvases, each paired
/// with its display duration in milliseconds.
pub fn decode_animation(data: &[u8]) -> Result<Vec<(RgbaImage, u32)>> {
    let decode_error = |message: &str| Error::WebPDecode(message.to_string());

    let mut options = MaybeUninit::<WebPAnimDecoderOptions>::uninit();
    // SAFETY: the init call fills every field of `options` before it is read.
    let mut options = unsafe {
        if WebPAnimDecoderOptionsInitInternal(options.as_mut_ptr(), WebPGetDemuxABIVersion()) == 0
        {
            return Err(decode_error("libwebp demux ABI version mismatch"));
        }
        options.assume_init()
    };
    options.color_mode = WEBP_CSP_MODE::MODE_RGBA;

    let webp_data = WebPData {
        bytes: data.as_ptr(),
        size: data.len(),
    };
    // SAFETY: `data` outlives the decoder, which is dropped at the end of this function.
    let raw =
        unsafe { WebPAnimDecoderNewInternal(&webp_data, &options, WebPGetDemuxABIVersion()) };
    let decoder =
        AnimationDecoder(NonNull::new(raw).ok_or_else(|| decode_error("not a WebP animation"))?);

    let mut info = MaybeUninit::<WebPAnimInfo>::uninit();
    // SAFETY: `info` is fully written when the call succeeds.
    let info = unsafe {
        if WebPAnimDecoderGetInfo(decoder.0.as_ptr(), info.as_mut_ptr()) == 0 {
            return Err(decode_error("cannot read animation info"));
        }
        info.assume_init()
    };
    let (width, height) = (info.canvas_width, info.canvas_height);
    let canvas_len = width as usize * height as usize * 4;

    let mut frames = Vec::with_capacity(info.frame_count as usize);
    let mut previous_end: c_int = 0;
    // SAFETY: each `buf` is a canvas of `canvas_len` bytes owned by the decoder
    // and valid until the next `GetNext`; it is copied before that.
    unsafe {
        while WebPAnimDecoderHasMoreFrames(decoder.0.as_ptr()) != 0 {
            let mut buf: *mut u8 = ptr::null_mut();
            let mut end: c_int = 0;
            if WebPAnimDecoderGetNext(decoder.0.as_ptr(), &mut buf, &mut end) == 0 || buf.is_null()
            {
                return Err(decode_error("corrupt animation frame"));
            }
            let pixels = std::slice::from_raw_parts(buf, canvas_len).to_vec();
            let image = RgbaImage::from_raw(width, height, pixels)
                .ok_or_else(|| decode_error("frame buffer size mismatch"))?;
            let duration = u32::try_from(end.saturating_sub(previous_end)).unwrap_or(0);
            previous_end = end;
            frames.push((image, duration));
        }
    }
    Ok(frames)
}
