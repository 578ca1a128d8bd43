//! Image to single-page PDF conversion
//!
//! Each image becomes one fixed-size US-Letter page with the picture
//! centered inside the configured margin. Aspect ratio is always kept:
//! large images are scaled down to fit the area inside the margins, small
//! ones may be scaled up at most [`MAX_UPSCALE`]×. Oversized sources are
//! downscaled pixel-wise first so a 100-megapixel scan doesn't blow up the
//! output file.

use std::io::Cursor;
use std::path::Path;

use image::imageops::FilterType;
use image::DynamicImage;
use lopdf::{Dictionary, Document, Object, Stream};

use crate::error::Result;
use crate::layout::{fit_image, Length, PageDimensions, PlacedImage};

/// Images are treated as 300 DPI when computing their natural page size
const SOURCE_DPI: f64 = 300.0;

/// Cap on how much a small image may be enlarged
const MAX_UPSCALE: f64 = 3.0;

/// Convert an image file to a single-page letter PDF.
///
/// `margin_pts` is the uniform page margin in points; `max_dim_px` bounds
/// the longest pixel side before placement (0 disables the bound).
pub fn image_to_pdf(
    image_path: &Path,
    out_pdf: &Path,
    margin_pts: u32,
    max_dim_px: u32,
) -> Result<()> {
    let mut img = image::open(image_path)?;

    if max_dim_px > 0 {
        img = downscale(img, max_dim_px);
    }

    let page = PageDimensions::letter();
    let natural_w = img.width() as f64 * 72.0 / SOURCE_DPI;
    let natural_h = img.height() as f64 * 72.0 / SOURCE_DPI;
    let placed = fit_image(
        &page,
        Length::from_pt(margin_pts as f64),
        natural_w,
        natural_h,
        MAX_UPSCALE,
    );

    // JPEG-encode the pixels once; the stream goes into the PDF as-is
    let rgb = img.to_rgb8();
    let (px_w, px_h) = rgb.dimensions();
    let mut jpeg = Vec::new();
    DynamicImage::ImageRgb8(rgb).write_to(&mut Cursor::new(&mut jpeg), image::ImageFormat::Jpeg)?;

    write_image_page(out_pdf, &jpeg, px_w, px_h, &page, placed)
}

/// Downscale if the longest side exceeds `max_dim` pixels
fn downscale(img: DynamicImage, max_dim: u32) -> DynamicImage {
    let longest = img.width().max(img.height());
    if longest <= max_dim {
        return img;
    }

    let ratio = max_dim as f64 / longest as f64;
    let new_w = (img.width() as f64 * ratio) as u32;
    let new_h = (img.height() as f64 * ratio) as u32;
    img.resize_exact(new_w.max(1), new_h.max(1), FilterType::Lanczos3)
}

/// Build a one-page PDF around a pre-encoded JPEG
fn write_image_page(
    output: &Path,
    jpeg: &[u8],
    px_w: u32,
    px_h: u32,
    page: &PageDimensions,
    placed: PlacedImage,
) -> Result<()> {
    let mut doc = Document::with_version("1.5");

    let mut image_dict = Dictionary::new();
    image_dict.set("Type", Object::Name(b"XObject".to_vec()));
    image_dict.set("Subtype", Object::Name(b"Image".to_vec()));
    image_dict.set("Width", Object::Integer(px_w as i64));
    image_dict.set("Height", Object::Integer(px_h as i64));
    image_dict.set("ColorSpace", Object::Name(b"DeviceRGB".to_vec()));
    image_dict.set("BitsPerComponent", Object::Integer(8));
    image_dict.set("Filter", Object::Name(b"DCTDecode".to_vec()));

    // Already compressed; lopdf must not deflate it again
    let image_stream = Stream {
        dict: image_dict,
        content: jpeg.to_vec(),
        allows_compression: false,
        start_position: None,
    };
    let image_id = doc.add_object(Object::Stream(image_stream));

    let content = format!(
        "q\n{:.2} 0 0 {:.2} {:.2} {:.2} cm\n/Im0 Do\nQ\n",
        placed.width, placed.height, placed.x, placed.y
    );
    let content_id = doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()));

    let mut xobjects = Dictionary::new();
    xobjects.set("Im0", Object::Reference(image_id));
    let mut resources = Dictionary::new();
    resources.set("XObject", Object::Dictionary(xobjects));

    let pages_id = doc.new_object_id();

    let mut page_dict = Dictionary::new();
    page_dict.set("Type", Object::Name(b"Page".to_vec()));
    page_dict.set("Parent", Object::Reference(pages_id));
    page_dict.set(
        "MediaBox",
        Object::Array(vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(page.width.pt().round() as i64),
            Object::Integer(page.height.pt().round() as i64),
        ]),
    );
    page_dict.set("Resources", Object::Dictionary(resources));
    page_dict.set("Contents", Object::Reference(content_id));
    let page_id = doc.add_object(Object::Dictionary(page_dict));

    let mut pages_object = Dictionary::new();
    pages_object.set("Type", Object::Name(b"Pages".to_vec()));
    pages_object.set("Count", Object::Integer(1));
    pages_object.set(
        "Kids",
        Object::Array(vec![Object::Reference(page_id)]),
    );
    doc.objects
        .insert(pages_id, Object::Dictionary(pages_object));

    let catalog_id = doc.new_object_id();
    let mut catalog = Dictionary::new();
    catalog.set("Type", Object::Name(b"Catalog".to_vec()));
    catalog.set("Pages", Object::Reference(pages_id));
    doc.objects.insert(catalog_id, Object::Dictionary(catalog));
    doc.trailer.set("Root", Object::Reference(catalog_id));

    doc.compress();
    doc.save(output)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::metadata::count_pages;
    use image::{Rgb, RgbImage};
    use tempfile::TempDir;

    fn write_test_png(dir: &Path, name: &str, w: u32, h: u32) -> std::path::PathBuf {
        let mut img = RgbImage::new(w, h);
        for p in img.pixels_mut() {
            *p = Rgb([200, 60, 60]);
        }
        let path = dir.join(name);
        img.save(&path).unwrap();
        path
    }

    #[test]
    fn test_image_becomes_one_page() {
        let tmp = TempDir::new().unwrap();
        let png = write_test_png(tmp.path(), "photo.png", 120, 80);
        let out = tmp.path().join("photo.pdf");

        image_to_pdf(&png, &out, 24, 4000).unwrap();

        assert_eq!(count_pages(&out).unwrap(), 1);
    }

    #[test]
    fn test_oversized_image_is_downscaled() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(800, 400));
        let small = downscale(img, 200);
        assert_eq!(small.width(), 200);
        assert_eq!(small.height(), 100);
    }

    #[test]
    fn test_small_image_is_left_alone() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(100, 50));
        let same = downscale(img, 200);
        assert_eq!((same.width(), same.height()), (100, 50));
    }

    #[test]
    fn test_unreadable_image_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let bogus = tmp.path().join("bogus.png");
        std::fs::write(&bogus, b"not an image").unwrap();

        let result = image_to_pdf(&bogus, &tmp.path().join("out.pdf"), 24, 4000);
        assert!(result.is_err());
    }
}
