use image::{Rgba, RgbaImage};

/// True when R, G and B are all strictly above `threshold`.
#[inline]
pub fn is_background(pixel: &Rgba<u8>, threshold: u8) -> bool {
    pixel[0] > threshold && pixel[1] > threshold && pixel[2] > threshold
}

/// Background pixels get alpha 0; RGB is always kept.
#[inline]
pub fn matte_pixel(pixel: Rgba<u8>, threshold: u8) -> Rgba<u8> {
    if is_background(&pixel, threshold) {
        Rgba([pixel[0], pixel[1], pixel[2], 0])
    } else {
        pixel
    }
}

/// Applies [`matte_pixel`] to every pixel of `image` in place.
pub fn matte_image_inplace(image: &mut RgbaImage, threshold: u8) {
    for pixel in image.pixels_mut() {
        *pixel = matte_pixel(*pixel, threshold);
    }
}

/// Copying variant of [`matte_image_inplace`].
pub fn matte_image(image: &RgbaImage, threshold: u8) -> RgbaImage {
    let mut out = image.clone();
    matte_image_inplace(&mut out, threshold);
    out
}
