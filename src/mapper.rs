use num::Float;

/// Linear interpolation of `value` from the screen range onto the model range.
pub fn to_model<T: Float>(value: T, screen_min: T, screen_max: T, model_min: T, model_max: T) -> T {
    model_min + (value - screen_min) * (model_max - model_min) / (screen_max - screen_min)
}

/// Inverse of [`to_model`], only used for drawing.
pub fn to_screen<T: Float>(value: T, model_min: T, model_max: T, screen_min: T, screen_max: T) -> T {
    screen_min + (value - model_min) * (screen_max - screen_min) / (model_max - model_min)
}

/// Maps canvas pixels onto the unit square the models work in.
///
/// Screen y grows downwards while model y grows upwards, so the y axis is flipped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    width: f32,
    height: f32,
}

impl CoordinateMapper {
    pub fn new(width: f32, height: f32) -> Self {
        CoordinateMapper { width, height }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn transform_x(&self, x: f32) -> f32 {
        to_model(x, 0., self.width, 0., 1.)
    }

    pub fn transform_y(&self, y: f32) -> f32 {
        to_model(y, 0., self.height, 1., 0.)
    }

    pub fn inverse_transform_x(&self, x: f32) -> f32 {
        to_screen(x, 0., 1., 0., self.width)
    }

    pub fn inverse_transform_y(&self, y: f32) -> f32 {
        to_screen(y, 1., 0., 0., self.height)
    }

    pub fn transform(&self, x: f32, y: f32) -> (f32, f32) {
        (self.transform_x(x), self.transform_y(y))
    }

    pub fn inverse_transform(&self, x: f32, y: f32) -> (f32, f32) {
        (self.inverse_transform_x(x), self.inverse_transform_y(y))
    }
}

/// A line segment in model space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: (f32, f32),
    pub end: (f32, f32),
}

impl Segment {
    pub fn new(start: (f32, f32), end: (f32, f32)) -> Self {
        Segment { start, end }
    }

    /// Liang-Barsky clip against `[0, 1] x [0, 1]`.
    ///
    /// Returns `None` when the segment misses the square or has a non-finite endpoint.
    pub fn clip_to_unit_square(self) -> Option<Segment> {
        let Segment {
            start: (x0, y0),
            end: (x1, y1),
        } = self;

        if ![x0, y0, x1, y1].iter().all(|v| v.is_finite()) {
            return None;
        }

        let dx = x1 - x0;
        let dy = y1 - y0;

        let mut t0 = 0f32;
        let mut t1 = 1f32;

        for (p, q) in [(-dx, x0), (dx, 1. - x0), (-dy, y0), (dy, 1. - y0)] {
            if p == 0. {
                if q < 0. {
                    return None;
                }
                continue;
            }

            let r = q / p;
            if p < 0. {
                if r > t1 {
                    return None;
                }
                t0 = t0.max(r);
            } else {
                if r < t0 {
                    return None;
                }
                t1 = t1.min(r);
            }
        }

        Some(Segment {
            start: (x0 + t0 * dx, y0 + t0 * dy),
            end: (x0 + t1 * dx, y0 + t1 * dy),
        })
    }

    pub fn to_screen(self, mapper: &CoordinateMapper) -> ((f32, f32), (f32, f32)) {
        (
            mapper.inverse_transform(self.start.0, self.start.1),
            mapper.inverse_transform(self.end.0, self.end.1),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f32 = 1e-3;

    #[test]
    fn inverse_law_holds_on_both_axes() {
        let mapper = CoordinateMapper::new(2400., 2400.);

        for i in 0..=240 {
            let pixel = i as f32 * 10.;

            let x = mapper.inverse_transform_x(mapper.transform_x(pixel));
            let y = mapper.inverse_transform_y(mapper.transform_y(pixel));

            assert!((x - pixel).abs() < TOLERANCE, "x: {} != {}", x, pixel);
            assert!((y - pixel).abs() < TOLERANCE, "y: {} != {}", y, pixel);
        }
    }

    #[test]
    fn y_axis_is_flipped() {
        let mapper = CoordinateMapper::new(800., 600.);

        assert_eq!(mapper.transform(0., 0.), (0., 1.));
        assert_eq!(mapper.transform(800., 600.), (1., 0.));
        assert_eq!(mapper.transform(400., 150.), (0.5, 0.75));

        assert_eq!(mapper.inverse_transform(0., 1.), (0., 0.));
        assert_eq!(mapper.inverse_transform(1., 0.), (800., 600.));
    }

    #[test]
    fn generic_range_mapping_works_for_f64() {
        assert_eq!(to_model(5f64, 0., 10., 100., 200.), 150.);
        assert_eq!(to_screen(150f64, 100., 200., 0., 10.), 5.);
    }

    #[test]
    fn clip_keeps_inner_segment() {
        let segment = Segment::new((0., 0.25), (1., 0.75));

        assert_eq!(segment.clip_to_unit_square(), Some(segment));
    }

    #[test]
    fn clip_cuts_steep_segment() {
        let clipped = Segment::new((0., -1.), (1., 3.))
            .clip_to_unit_square()
            .unwrap();

        assert!((clipped.start.0 - 0.25).abs() < 1e-6);
        assert!(clipped.start.1.abs() < 1e-6);
        assert!((clipped.end.0 - 0.5).abs() < 1e-6);
        assert!((clipped.end.1 - 1.).abs() < 1e-6);
    }

    #[test]
    fn clip_rejects_missing_and_non_finite_segments() {
        assert_eq!(Segment::new((0., 2.), (1., 3.)).clip_to_unit_square(), None);
        assert_eq!(
            Segment::new((0., f32::INFINITY), (1., 0.5)).clip_to_unit_square(),
            None
        );
        assert_eq!(Segment::new((0., f32::NAN), (1., 0.5)).clip_to_unit_square(), None);
    }

    #[test]
    fn vertical_segment_survives_clip() {
        let segment = Segment::new((0.5, 0.), (0.5, 1.));

        assert_eq!(segment.clip_to_unit_square(), Some(segment));
    }
}
