use test_log::test;

use mandelblock::complex::c;
use mandelblock::error::GeometryError;
use mandelblock::painter::{AsciiPainter, Painter};
use mandelblock::{
    generate, generate_as, Error, Geometry, IterationMap, Mandelbrot, Representation, Resolution,
};

fn mismatches(a: &IterationMap, b: &IterationMap) -> usize {
    a.iter().zip(b.iter()).filter(|(x, y)| x != y).count()
}

#[test]
fn test_initial_view() {
    let limit = 1_000_000;
    let geometry = Geometry::initial(Resolution::new(80, 40))
        .convert::<f32>()
        .unwrap();
    let map = generate(&geometry, limit).unwrap();

    assert_eq!(map.width(), 80);
    assert_eq!(map.height(), 40);
    // -2-2i is outside the escape radius from the start
    assert_eq!(map.get(0, 0), 0);
    // 0+0i
    assert_eq!(map.get(40, 20), limit);
    assert!(map.is_confined(40, 20));

    let buffer = map.into_vec();
    assert_eq!(buffer.len(), 3200);
    assert_eq!(buffer[20 * 80 + 40], limit);
    assert!(buffer.iter().all(|&count| count <= limit));
}

#[test]
fn test_representations_agree() {
    let limit = 50;
    let geometry = Geometry::initial(Resolution::new(64, 32));
    let reference = generate(&geometry, limit).unwrap();
    let tolerance = reference.iter().count() / 50;

    for repr in Representation::ALL {
        let map = generate_as(repr, &geometry, limit, 0).unwrap();
        assert_eq!(map.resolution(), reference.resolution());
        let diff = mismatches(&map, &reference);
        assert!(diff <= tolerance, "{}: {} points differ", repr, diff);
    }
}

#[test]
fn test_fixed_far_from_origin() {
    // every point is well outside the escape radius
    let geometry = Geometry::new(c(8.0, 8.0), c(4.0, 0.0), c(0.0, 4.0), Resolution::new(8, 4));
    let reference = generate(&geometry, 100).unwrap();
    assert!(reference.iter().all(|count| count == 0));
    for repr in [Representation::Fixed32, Representation::Fixed64] {
        let map = generate_as(repr, &geometry, 100, 0).unwrap();
        assert_eq!(map, reference, "{}", repr);
    }

    // squares overflow the 64-bit fixed-point range
    let geometry = Geometry::new(
        c(2.0e5, -2.0e5),
        c(1.0e3, 0.0),
        c(0.0, 1.0e3),
        Resolution::new(4, 4),
    );
    let reference = generate(&geometry, 100).unwrap();
    let fixed = generate_as(Representation::Fixed64, &geometry, 100, 0).unwrap();
    assert_eq!(fixed, reference);
}

#[test]
fn test_threaded_is_identical() {
    let geometry = Geometry::initial(Resolution::new(57, 31));
    for repr in Representation::ALL {
        let single = generate_as(repr, &geometry, 300, 0).unwrap();
        let threaded = generate_as(repr, &geometry, 300, 4).unwrap();
        assert_eq!(single, threaded, "{}", repr);
    }
}

#[test]
fn test_default_threads() {
    let geometry = Geometry::initial(Resolution::new(24, 12));
    let mandelbrot = Mandelbrot::<f64>::threaded_default(100).unwrap();
    assert_eq!(mandelbrot.limit(), 100);
    let map = mandelbrot.generate(&geometry).unwrap();
    assert_eq!(map, generate(&geometry, 100).unwrap());
}

#[test]
fn test_limit_one() {
    let geometry = Geometry::initial(Resolution::new(16, 8));
    let map = generate(&geometry, 1).unwrap();
    assert!(map.iter().all(|count| count <= 1));
    assert_eq!(map.get(8, 4), 1);
}

#[test]
fn test_ascii_rows() {
    let geometry = Geometry::initial(Resolution::new(80, 40));
    let map = generate_as(Representation::Fixed64, &geometry, 100, 0).unwrap();
    let text = AsciiPainter.paint(&map);
    assert_eq!(text.lines().count(), 40);
    assert!(text.lines().all(|line| line.len() == 80));
}

#[test]
fn test_errors() {
    let geometry = Geometry::initial(Resolution::new(16, 16));

    assert!(matches!(generate(&geometry, 0), Err(Error::Limit(0))));

    let empty = Geometry::initial(Resolution::new(0, 16));
    assert!(matches!(
        generate(&empty, 10),
        Err(Error::Geometry(GeometryError::EmptyResolution { .. }))
    ));

    let flat = Geometry::new(c(-2.0, -2.0), c(0.0, 0.0), c(0.0, 4.0), Resolution::new(8, 8));
    assert!(matches!(
        generate(&flat, 10),
        Err(Error::Geometry(GeometryError::DegenerateX))
    ));

    let far = Geometry::new(c(-200.0, 0.0), c(4.0, 0.0), c(0.0, 4.0), Resolution::new(8, 8));
    assert!(matches!(
        generate_as(Representation::Fixed32, &far, 10, 0),
        Err(Error::OutOfRange { .. })
    ));
}
