use chartopt_core::{coercible, type_sensitive, Coerced};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Point {
    x: f64,
    y: f64,
}

coercible!(Point as "Point": dict, json, js_literal, array);

#[derive(Debug, Default)]
struct Series {
    data: Coerced<Point>,
}

impl Series {
    type_sensitive! {
        pub fn set_data(&mut self, value) -> data: Point { force_iterable: true }
    }
}

fn main() {
    let mut series = Series::default();

    match series.set_data(r#"[[0, 1], [1, 3.5], {"x": 2, "y": 2}]"#) {
        Ok(()) => println!("Coerced series data: {:?}", series.data),
        Err(e) => eprintln!("Failed to coerce series data: {e:?}"),
    }

    match series.set_data(42_i64) {
        Ok(()) => println!("Unexpectedly accepted an integer"),
        Err(e) => eprintln!("Rejected as expected: {e}"),
    }
}
