use fast_image_resize::{images::Image, FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer};
use image::{DynamicImage, GenericImageView, ImageFormat, ImageReader, Limits, RgbaImage};
use std::io::Cursor;

use crate::uploads::application::{
    domain::{errors::UploadError, policies::upload_policy::UploadPolicy},
    ports::outgoing::{ImageSource, ImageSourceError},
};

const MAX_SOURCE_SIDE: u32 = 16_384;
const MAX_DECODE_ALLOC: u64 = 256 * 1024 * 1024;

/// Formats the normalizer will write back out. Anything else is re-encoded
/// as PNG.
fn output_format(file_name: &str, decoded: Option<ImageFormat>) -> ImageFormat {
    let supported = |f: &ImageFormat| {
        matches!(f, ImageFormat::Png | ImageFormat::Jpeg | ImageFormat::Gif)
    };

    ImageFormat::from_path(file_name)
        .ok()
        .filter(supported)
        .or(decoded.filter(supported))
        .unwrap_or(ImageFormat::Png)
}

/// Crop the centred square of `img`, then resize it to `dimension` x
/// `dimension`. Only the square is ever converted or scaled.
fn cover_square(img: DynamicImage, dimension: u32) -> Result<RgbaImage, String> {
    let (w, h) = img.dimensions();
    if w == 0 || h == 0 {
        return Err("Image has no pixels".to_string());
    }

    let side = w.min(h);
    let square = img.crop_imm((w - side) / 2, (h - side) / 2, side, side);

    let src_image = Image::from_vec_u8(side, side, square.to_rgba8().into_raw(), PixelType::U8x4)
        .map_err(|e| format!("Failed to create image: {}", e))?;

    let mut dst_image = Image::new(dimension, dimension, PixelType::U8x4);
    Resizer::new()
        .resize(
            &src_image,
            &mut dst_image,
            &ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Bilinear)),
        )
        .map_err(|e| format!("Resize failed: {}", e))?;

    RgbaImage::from_raw(dimension, dimension, dst_image.buffer().to_vec())
        .ok_or_else(|| "Resized buffer has the wrong size".to_string())
}

fn decode_limits() -> Limits {
    let mut limits = Limits::default();
    limits.max_image_width = Some(MAX_SOURCE_SIDE);
    limits.max_image_height = Some(MAX_SOURCE_SIDE);
    limits.max_alloc = Some(MAX_DECODE_ALLOC);
    limits
}

fn encode(img: RgbaImage, format: ImageFormat) -> Result<Vec<u8>, String> {
    let mut out = Cursor::new(Vec::new());

    let result = match format {
        // JPEG has no alpha channel.
        ImageFormat::Jpeg => {
            DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(img).to_rgb8()).write_to(&mut out, format)
        }
        _ => DynamicImage::ImageRgba8(img).write_to(&mut out, format),
    };
    result.map_err(|e| format!("Failed to encode {:?}: {}", format, e))?;

    Ok(out.into_inner())
}

/// Decode, cover-crop to a square and re-encode. CPU-bound.
pub fn resize_to_square(bytes: &[u8], file_name: &str, dimension: u32) -> Result<Vec<u8>, String> {
    let mut reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| format!("Failed to guess format: {}", e))?;
    reader.limits(decode_limits());

    let format = output_format(file_name, reader.format());
    let img = reader
        .decode()
        .map_err(|e| format!("Failed to decode image: {}", e))?;

    let square = cover_square(img, dimension)?;
    encode(square, format)
}

/// Fetches URL-sourced images and resizes them for avatar use.
pub struct ImageNormalizer<S>
where
    S: ImageSource,
{
    source: S,
}

impl<S> ImageNormalizer<S>
where
    S: ImageSource,
{
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Fetch `source_url` within the policy size limit and resize it to the
    /// policy avatar dimension.
    pub async fn normalize(
        &self,
        source_url: &str,
        file_name: &str,
        policy: &UploadPolicy,
    ) -> Result<Vec<u8>, UploadError> {
        let target_dimension = policy.profile_image_dimension;
        let bytes = self
            .source
            .fetch(source_url, policy.maximum_file_size_bytes())
            .await
            .map_err(|e| match e {
                ImageSourceError::TooLarge { .. } => UploadError::FileTooBig {
                    limit_kb: policy.maximum_file_size_kb,
                },
                other => {
                    UploadError::upstream(format!("failed to fetch {}: {}", source_url, other))
                }
            })?;

        tracing::info!(
            url = %source_url,
            fetched_bytes = bytes.len(),
            target_dimension,
            "Resizing remote image"
        );

        let file_name = file_name.to_string();
        tokio::task::spawn_blocking(move || resize_to_square(&bytes, &file_name, target_dimension))
            .await
            .map_err(|e| UploadError::upstream(format!("resize task failed: {}", e)))?
            .map_err(UploadError::upstream)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::support::stubs::StaticImageSource;
    use image::Rgba;

    fn avatar_policy(dimension: u32) -> UploadPolicy {
        UploadPolicy::new(2048, Some(dimension))
    }

    fn encoded(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
        let img = RgbaImage::from_fn(width, height, |x, _| {
            if x < width / 2 {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 0, 255, 255])
            }
        });
        let mut out = Cursor::new(Vec::new());
        let dynamic = match format {
            ImageFormat::Jpeg => DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(img).to_rgb8()),
            _ => DynamicImage::ImageRgba8(img),
        };
        dynamic.write_to(&mut out, format).unwrap();
        out.into_inner()
    }

    fn decode(bytes: &[u8]) -> (ImageFormat, DynamicImage) {
        let reader = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .unwrap();
        let format = reader.format().unwrap();
        (format, reader.decode().unwrap())
    }

    #[test]
    fn landscape_image_is_cropped_to_square() {
        let out = resize_to_square(&encoded(300, 200, ImageFormat::Png), "a.png", 128).unwrap();
        let (format, img) = decode(&out);

        assert_eq!(format, ImageFormat::Png);
        assert_eq!(img.dimensions(), (128, 128));
    }

    #[test]
    fn small_image_is_scaled_up_to_cover() {
        let out = resize_to_square(&encoded(40, 10, ImageFormat::Png), "a.png", 64).unwrap();
        let (_, img) = decode(&out);

        assert_eq!(img.dimensions(), (64, 64));
    }

    #[test]
    fn crop_keeps_the_centre() {
        // Left half red, right half blue: the centre column boundary must survive.
        let out = resize_to_square(&encoded(400, 100, ImageFormat::Png), "a.png", 100).unwrap();
        let (_, img) = decode(&out);

        let left = img.get_pixel(10, 50);
        let right = img.get_pixel(90, 50);
        assert!(left[0] > 200 && left[2] < 50);
        assert!(right[2] > 200 && right[0] < 50);
    }

    #[test]
    fn extreme_aspect_ratio_only_scales_the_square() {
        let tall = RgbaImage::from_pixel(1, 12_000, Rgba([0, 128, 0, 255]));
        let mut bytes = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(tall)
            .write_to(&mut bytes, ImageFormat::Png)
            .unwrap();

        let out = resize_to_square(&bytes.into_inner(), "strip.png", 128).unwrap();
        let (_, img) = decode(&out);

        assert_eq!(img.dimensions(), (128, 128));
        assert_eq!(img.get_pixel(64, 64), Rgba([0, 128, 0, 255]));
    }

    #[test]
    fn source_wider_than_decode_limit_is_refused() {
        let wide = RgbaImage::new(MAX_SOURCE_SIDE + 1, 1);
        let mut bytes = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(wide)
            .write_to(&mut bytes, ImageFormat::Png)
            .unwrap();

        let err = resize_to_square(&bytes.into_inner(), "wide.png", 128).unwrap_err();
        assert!(err.starts_with("Failed to decode image"));
    }

    #[test]
    fn output_keeps_source_format_by_extension() {
        let out = resize_to_square(&encoded(64, 64, ImageFormat::Jpeg), "me.jpg", 32).unwrap();
        assert_eq!(decode(&out).0, ImageFormat::Jpeg);

        let out = resize_to_square(&encoded(64, 64, ImageFormat::Gif), "me.gif", 32).unwrap();
        assert_eq!(decode(&out).0, ImageFormat::Gif);
    }

    #[test]
    fn unknown_extension_falls_back_to_decoded_format() {
        let out = resize_to_square(&encoded(64, 64, ImageFormat::Jpeg), "avatar", 32).unwrap();
        assert_eq!(decode(&out).0, ImageFormat::Jpeg);
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let err = resize_to_square(b"definitely not an image", "a.png", 32).unwrap_err();
        assert!(err.starts_with("Failed to"));
    }

    #[tokio::test]
    async fn normalize_fetches_and_resizes() {
        let source = StaticImageSource::ok(encoded(256, 128, ImageFormat::Png));
        let normalizer = ImageNormalizer::new(source.clone());

        let out = normalizer
            .normalize("https://img.example.com/me.png", "me.png", &avatar_policy(128))
            .await
            .unwrap();

        assert_eq!(decode(&out).1.dimensions(), (128, 128));
        assert_eq!(
            source.fetched_urls(),
            vec!["https://img.example.com/me.png".to_string()]
        );
    }

    #[tokio::test]
    async fn fetch_failure_is_wrapped_upstream() {
        let normalizer = ImageNormalizer::new(StaticImageSource::err(ImageSourceError::Status(404)));

        let err = normalizer
            .normalize("https://img.example.com/missing.png", "missing.png", &avatar_policy(128))
            .await
            .unwrap_err();

        match err {
            UploadError::UpstreamFailure(msg) => {
                assert!(msg.contains("missing.png"));
                assert!(msg.contains("404"));
            }
            other => panic!("expected UpstreamFailure, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn resize_failure_is_wrapped_upstream() {
        let normalizer = ImageNormalizer::new(StaticImageSource::ok(b"<html>".to_vec()));

        let err = normalizer
            .normalize("https://img.example.com/me.png", "me.png", &avatar_policy(128))
            .await
            .unwrap_err();

        assert!(matches!(err, UploadError::UpstreamFailure(_)));
        assert!(err.to_string().starts_with("upyun-uploads :: "));
    }

    #[tokio::test]
    async fn oversized_fetch_is_file_too_big() {
        let source = StaticImageSource::ok(encoded(64, 64, ImageFormat::Png));
        let normalizer = ImageNormalizer::new(source.clone());

        let err = normalizer
            .normalize("https://img.example.com/me.png", "me.png", &UploadPolicy::new(0, Some(32)))
            .await
            .unwrap_err();

        assert_eq!(err, UploadError::FileTooBig { limit_kb: 0 });
        assert_eq!(source.fetched_urls().len(), 1);
    }
}
