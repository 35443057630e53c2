pub mod rect;
pub use rect::Rect;

use rand::Rng;

/// A spatial region particles can be placed in
pub trait Region {
    fn contains(&self, coord: &[f64; 3]) -> bool;
    fn bounding_box(&self) -> &Rect;
    fn get_random_coord<R: Rng + ?Sized>(&self, rng: &mut R) -> [f64; 3];
}
