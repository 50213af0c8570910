use super::*;
use crate::config::color::Rgb8;

fn frame_with(w: u32, h: u32, bg: [u8; 4], dots: &[(u32, u32, [u8; 4])]) -> RgbaImage {
    let mut img = RgbaImage::from_pixel(w, h, image::Rgba(bg));
    for &(x, y, px) in dots {
        img.put_pixel(x, y, image::Rgba(px));
    }
    img
}

const INK: [u8; 4] = [200, 40, 40, 255];

#[test]
fn single_pixel_bounds() {
    let img = frame_with(20, 20, [0, 0, 0, 0], &[(5, 5, INK)]);
    let b = find_content_bounds(&img, &ChromaKey::alpha_only()).unwrap();
    assert_eq!(
        b,
        ContentBounds {
            min_x: 5,
            min_y: 5,
            max_x: 5,
            max_y: 5
        }
    );
    assert_eq!((b.width(), b.height()), (1, 1));
}

#[test]
fn spans_all_content_pixels() {
    let img = frame_with(16, 12, [0, 0, 0, 0], &[(2, 9, INK), (11, 3, INK), (6, 6, INK)]);
    let b = find_content_bounds(&img, &ChromaKey::alpha_only()).unwrap();
    assert_eq!(
        b,
        ContentBounds {
            min_x: 2,
            min_y: 3,
            max_x: 11,
            max_y: 9
        }
    );
    assert_eq!((b.width(), b.height()), (10, 7));
}

#[test]
fn key_color_background_is_ignored() {
    let magenta = [255, 0, 255, 255];
    let img = frame_with(8, 8, magenta, &[(1, 6, INK)]);
    let key = ChromaKey::new(Rgb8::new(255, 0, 255), 0.0);
    let b = find_content_bounds(&img, &key).unwrap();
    assert_eq!((b.min_x, b.min_y, b.max_x, b.max_y), (1, 6, 1, 6));

    // Without the key, the opaque magenta fill is all content.
    let b = find_content_bounds(&img, &ChromaKey::alpha_only()).unwrap();
    assert_eq!((b.width(), b.height()), (8, 8));
}

#[test]
fn empty_frame_has_no_bounds() {
    let img = frame_with(4, 4, [0, 0, 0, 0], &[]);
    assert_eq!(find_content_bounds(&img, &ChromaKey::alpha_only()), None);

    let img = frame_with(4, 4, [255, 255, 255, 255], &[(0, 0, [0, 0, 0, 255])]);
    let everything_keyed = ChromaKey::new(Rgb8::BLACK, 100.0);
    assert_eq!(find_content_bounds(&img, &everything_keyed), None);
}

#[test]
fn center_alignment_centers_box() {
    let b = ContentBounds {
        min_x: 5,
        min_y: 5,
        max_x: 5,
        max_y: 5,
    };
    let canvas = Canvas {
        width: 20,
        height: 20,
    };
    let r = aligned_dest(b, canvas, 1.0, AlignMode::Center);
    assert_eq!(r, Rect::new(9.0, 9.0, 10.0, 10.0));

    let r = aligned_dest(b, canvas, 1.0, AlignMode::Other);
    assert_eq!(r, Rect::new(9.0, 9.0, 10.0, 10.0));
}

#[test]
fn bottom_alignment_is_flush_with_bottom_edge() {
    let b = ContentBounds {
        min_x: 5,
        min_y: 5,
        max_x: 5,
        max_y: 5,
    };
    let canvas = Canvas {
        width: 20,
        height: 20,
    };
    let r = aligned_dest(b, canvas, 1.0, AlignMode::Bottom);
    assert_eq!(r, Rect::new(9.0, 19.0, 10.0, 20.0));
}

#[test]
fn alignment_accounts_for_scale() {
    let b = ContentBounds {
        min_x: 0,
        min_y: 0,
        max_x: 2,
        max_y: 1,
    };
    let canvas = Canvas {
        width: 16,
        height: 16,
    };
    let r = aligned_dest(b, canvas, 3.0, AlignMode::Center);
    // (16 - 9) / 2 = 3.5 -> 3 ; (16 - 6) / 2 = 5
    assert_eq!(r, Rect::new(3.0, 5.0, 12.0, 11.0));

    let r = aligned_dest(b, canvas, 2.5, AlignMode::Bottom);
    assert_eq!(r.y1, 16.0);
    assert_eq!(r.y0, 11.0);
}

#[test]
fn source_rect_offsets_from_frame_origin() {
    let b = ContentBounds {
        min_x: 3,
        min_y: 4,
        max_x: 6,
        max_y: 4,
    };
    let frame = Rect::new(32.0, 16.0, 64.0, 48.0);
    assert_eq!(b.source_rect(frame), Rect::new(35.0, 20.0, 39.0, 21.0));
}
