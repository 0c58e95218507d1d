//! Animations compiled into the binary
//!
//! Served until the first successful refresh from an external source, and
//! kept if that source is never reachable.

use std::time::Duration;

use super::frame::{Catalog, Sequence};

const SPINNER: &[&str] = &[
    r"
    |
",
    r"
    /
",
    r"
    -
",
    r"
    \
",
];

const BOUNCE: &[&str] = &[
    r"
 o
___________
",
    r"
    o
___________
",
    r"
       o
___________
",
    r"
          o
___________
",
    r"
       o
___________
",
    r"
    o
___________
",
];

const HEART: &[&str] = &[
    r"
   .-.-.
  (     )
   '. .'
     '
",
    r"
  .-. .-.
 (   '   )
  '.   .'
    '.'
",
];

const WAVE: &[&str] = &[
    r"
  \o/
   |
  / \
",
    r"
  _o_
   |
  / \
",
    r"
   o/
  /|
  / \
",
    r"
  _o_
   |
  / \
",
];

/// Catalog of built-in animations
pub fn catalog() -> Catalog {
    Catalog::new()
        .with("spinner", Sequence::from_static(SPINNER, Duration::from_millis(100)))
        .with("bounce", Sequence::from_static(BOUNCE, Duration::from_millis(120)))
        .with("heart", Sequence::from_static(HEART, Duration::from_millis(400)))
        .with("wave", Sequence::from_static(WAVE, Duration::from_millis(250)))
}
