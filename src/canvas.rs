use std::io::{ self, Write, BufWriter };
use std::fs::File;
use std::path::Path;

use log::info;

use crate::color::Color;
use crate::error::{ Error, Result };

/// A canvas for drawing pixels.
///
/// This structure stores the results of the ray tracer. The `Camera` casts
/// one ray per pixel into a `World` and writes the resulting color here, each
/// pixel exactly once.
///
/// Colors are kept linear and unclamped. Clamping and quantization only
/// happen when the canvas is saved to an image file.
#[derive(Clone, Default, Debug, PartialEq)]
pub struct Canvas {
    /// The width of the canvas, in pixels.
    pub width: usize,

    /// The height of the canvas, in pixels.
    pub height: usize,

    /// The pixels of the canvas, stored as a flattened vector.
    pixels: Vec<Color>,
}

impl Canvas {
    /// Creates a new black canvas with specified width and height.
    pub fn new(width: usize, height: usize) -> Canvas {
        Canvas {
            width,
            height,
            pixels: vec![Color::black(); width * height]
        }
    }

    /// Saves the canvas to an image file.
    ///
    /// The format is picked from the file extension: `.png` or `.ppm`. Any
    /// failure to create, encode or write the file is returned; a partially
    /// written file is never reported as a success.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let ext = path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("png") => {
                self.to_rgb_image()
                    .save_with_format(path, image::ImageFormat::Png)?;
            },
            Some("ppm") => {
                let mut out = BufWriter::new(File::create(path)?);
                self.write_ppm(&mut out)?;
                out.flush()?;
            },
            _ => return Err(Error::UnsupportedFormat(path.into())),
        }

        info!("Saved {}x{} render to {}.", self.width, self.height,
            path.display());
        Ok(())
    }

    /// Converts the canvas to an 8-bit RGB image.
    pub fn to_rgb_image(&self) -> image::RgbImage {
        image::RgbImage::from_fn(self.width as u32, self.height as u32,
            |x, y| {
                let c = self.pixels[(y as usize * self.width) + x as usize];
                image::Rgb(c.to_rgb8())
            })
    }

    /// Writes the canvas as a plain (P3) PPM image.
    ///
    /// Lines in the PPM body are clamped to 70 columns. If a channel value
    /// would pass the 70 column mark on a line, it is moved to the next line.
    pub fn write_ppm<W: Write>(&self, out: &mut W) -> io::Result<()> {
        // Write PPM header, as well as metadata
        writeln!(out, "P3")?;
        writeln!(out, "{} {}", self.width, self.height)?;
        writeln!(out, "255")?; // Maximum color value

        let mut col = 0;
        for pixel in self.pixels.iter() {
            for channel in pixel.to_rgb8().iter() {
                let s = channel.to_string();

                if col == 0 {
                    write!(out, "{}", s)?;
                    col = s.len();
                } else if col + 1 + s.len() > 70 {
                    write!(out, "\n{}", s)?;
                    col = s.len();
                } else {
                    write!(out, " {}", s)?;
                    col += 1 + s.len();
                }
            }
        }

        // Terminate the PPM file with a newline
        writeln!(out)?;
        Ok(())
    }

    /// Writes a color to a location on the `Canvas`.
    ///
    /// Out-of-bounds pixels are ignored. Pixels are specified in row-column
    /// order, where `y` is the row of the pixel, and `x` is the column. Rows
    /// and columns are zero-indexed.
    ///
    /// # Examples
    ///
    /// Writing a pixel to the fourth column, second row on an 8-by-8 canvas:
    ///
    /// ```
    /// # use whitted_tracer::color::Color;
    /// # use whitted_tracer::canvas::Canvas;
    /// let sky = Color::background();
    /// let mut canvas = Canvas::new(8, 8);
    /// canvas.write_pixel(4, 2, &sky);
    /// assert_eq!(canvas.read_pixel(4, 2).unwrap(), sky);
    /// ```
    pub fn write_pixel(&mut self, x: usize, y: usize, pixel: &Color) {
        // Silently ignore out-of-bounds pixels
        if x >= self.width || y >= self.height {
            return;
        }

        self.pixels[(y * self.width) + x] = *pixel;
    }

    /// Writes a full row of colors, starting from the left edge.
    ///
    /// Colors past the right edge, and rows below the bottom, are ignored.
    pub fn write_row(&mut self, y: usize, row: &[Color]) {
        if y >= self.height {
            return;
        }

        let start = y * self.width;
        let n = row.len().min(self.width);
        self.pixels[start..start + n].copy_from_slice(&row[..n]);
    }

    /// Reads a color from a location on the `Canvas`.
    ///
    /// If the specified pixel location is out-of-bounds, `None` is returned
    /// by this function.
    pub fn read_pixel(&self, x: usize, y: usize) -> Option<Color> {
        // Return nothing if pixel is out-of-bounds
        if x >= self.width || y >= self.height {
            return None
        }

        Some(self.pixels[(y * self.width) + x])
    }
}

#[test]
fn new_canvas_is_black() {
    let c = Canvas::new(10, 20);

    assert_eq!(c.width, 10);
    assert_eq!(c.height, 20);
    for y in 0..20 {
        for x in 0..10 {
            assert_eq!(c.read_pixel(x, y).unwrap(), Color::black());
        }
    }
}

#[test]
fn out_of_bounds_pixels_are_ignored() {
    let mut c = Canvas::new(2, 2);
    c.write_pixel(2, 0, &Color::white());
    c.write_row(5, &[Color::white(), Color::white()]);

    assert_eq!(c.read_pixel(2, 0), None);
    assert_eq!(c, Canvas::new(2, 2));
}

#[test]
fn write_row_fills_one_row() {
    let mut c = Canvas::new(3, 2);
    c.write_row(1, &[Color::white(), Color::background(), Color::white()]);

    assert_eq!(c.read_pixel(0, 0).unwrap(), Color::black());
    assert_eq!(c.read_pixel(1, 1).unwrap(), Color::background());
    assert_eq!(c.read_pixel(2, 1).unwrap(), Color::white());
}

#[test]
fn ppm_header_and_quantized_pixels() {
    let mut c = Canvas::new(5, 3);
    c.write_pixel(0, 0, &Color::rgb(1.5, 0.0, 0.0));
    c.write_pixel(2, 1, &Color::rgb(0.0, 0.5, 0.0));
    c.write_pixel(4, 2, &Color::rgb(-0.5, 0.0, 1.0));

    let mut out = Vec::new();
    c.write_ppm(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines[0], "P3");
    assert_eq!(lines[1], "5 3");
    assert_eq!(lines[2], "255");

    let values: Vec<u8> = lines[3..].iter()
        .flat_map(|l| l.split_whitespace())
        .map(|v| v.parse().unwrap())
        .collect();
    assert_eq!(values.len(), 5 * 3 * 3);
    assert_eq!(&values[0..3], &[255, 0, 0]);
    assert_eq!(&values[(7 * 3)..(7 * 3 + 3)], &[0, 128, 0]);
    assert_eq!(&values[(14 * 3)..], &[0, 0, 255]);
    assert!(text.ends_with('\n'));
}

#[test]
fn ppm_lines_stay_within_70_columns() {
    let mut c = Canvas::new(10, 2);
    for y in 0..2 {
        for x in 0..10 {
            c.write_pixel(x, y, &Color::rgb(1.0, 0.8, 0.6));
        }
    }

    let mut out = Vec::new();
    c.write_ppm(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();

    for line in text.lines() {
        assert!(line.len() <= 70);
    }
}

#[test]
fn png_image_has_quantized_pixels() {
    let mut c = Canvas::new(2, 1);
    c.write_pixel(1, 0, &Color::background());
    let img = c.to_rgb_image();

    assert_eq!(img.dimensions(), (2, 1));
    assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0]);
    assert_eq!(img.get_pixel(1, 0).0, [55, 176, 202]);
}

#[test]
fn unsupported_extension_is_an_error() {
    let c = Canvas::new(1, 1);
    let path = std::env::temp_dir().join("whitted_tracer_test.bmpx");

    match c.save(&path) {
        Err(Error::UnsupportedFormat(p)) => assert_eq!(p, path),
        other => panic!("Expected an unsupported format error, got {:?}.",
            other),
    }
}

#[test]
fn save_to_missing_directory_fails() {
    let c = Canvas::new(1, 1);
    let path = std::env::temp_dir()
        .join("whitted_tracer_missing_dir")
        .join("out.ppm");

    assert!(matches!(c.save(&path), Err(Error::Io(_))));
}

#[test]
fn save_png_and_ppm() {
    let mut c = Canvas::new(4, 3);
    c.write_pixel(1, 1, &Color::white());

    let dir = std::env::temp_dir();
    let png = dir.join(format!("whitted_tracer_{}.png", std::process::id()));
    let ppm = dir.join(format!("whitted_tracer_{}.ppm", std::process::id()));

    c.save(&png).unwrap();
    c.save(&ppm).unwrap();

    let decoded = image::open(&png).unwrap().to_rgb8();
    assert_eq!(decoded, c.to_rgb_image());

    let text = std::fs::read_to_string(&ppm).unwrap();
    assert!(text.starts_with("P3\n4 3\n255\n"));

    std::fs::remove_file(png).unwrap();
    std::fs::remove_file(ppm).unwrap();
}
