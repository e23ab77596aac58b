#![allow(dead_code)]

use std::io::{BufRead, BufReader, Cursor, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

/// Answer exactly one HTTP request on a loopback port, then close.
pub fn serve_once(status: &'static str, body: Vec<u8>) -> (String, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback");
    let addr = listener.local_addr().expect("local addr");
    let handle = thread::spawn(move || {
        let Ok((mut stream, _)) = listener.accept() else {
            return;
        };
        let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));
        let mut line = String::new();
        loop {
            line.clear();
            match reader.read_line(&mut line) {
                Ok(0) | Err(_) => break,
                Ok(_) if line == "\r\n" => break,
                Ok(_) => {}
            }
        }
        let header = format!(
            "HTTP/1.1 {status}\r\nContent-Type: image/png\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            body.len()
        );
        let _ = stream.write_all(header.as_bytes());
        let _ = stream.write_all(&body);
        let _ = stream.flush();
    });
    (format!("http://{addr}/captcha.png"), handle)
}

/// Gray background with two saturated red blocks standing in for glyphs.
pub fn synthetic_captcha() -> RgbImage {
    let mut image = RgbImage::from_pixel(40, 20, Rgb([180, 180, 175]));
    for (x0, x1) in [(4u32, 10u32), (24, 30)] {
        for x in x0..x1 {
            for y in 5..15 {
                image.put_pixel(x, y, Rgb([210, 30, 40]));
            }
        }
    }
    image
}

pub fn png_bytes(image: &RgbImage) -> Vec<u8> {
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(image.clone())
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .expect("encode png");
    bytes
}
