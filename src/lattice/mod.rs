mod unit_cell;

pub use unit_cell::UnitCell;

use log::info;

use crate::{
    region::{Rect, Region},
    AtomType, Atoms, Container, Error, Result,
};

/// A periodic arrangement of basis sites in an orthorhombic cell
pub trait Lattice {
    fn cell_lengths(&self) -> [f64; 3];
    /// Basis sites in fractional cell coordinates
    fn basis(&self) -> &[[f64; 3]];

    /// Lattice sites inside `region`, for a lattice anchored at `origin`
    fn coords_within_region<R: Region>(&self, region: &R, origin: &[f64; 3]) -> Vec<[f64; 3]> {
        let a = self.cell_lengths();
        let bounding_box = region.bounding_box();
        let bblo = bounding_box.lo();
        let bbhi = bounding_box.hi();
        let mut first = [0i64; 3];
        let mut last = [0i64; 3];
        for k in 0..3 {
            first[k] = ((bblo[k] - origin[k]) / a[k]).floor() as i64;
            last[k] = ((bbhi[k] - origin[k]) / a[k]).floor() as i64 + 1;
        }

        let mut coords: Vec<[f64; 3]> = Vec::new();
        for i in first[0]..last[0] {
            for j in first[1]..last[1] {
                for k in first[2]..last[2] {
                    for b in self.basis() {
                        let coord = [
                            origin[0] + (i as f64 + b[0]) * a[0],
                            origin[1] + (j as f64 + b[1]) * a[1],
                            origin[2] + (k as f64 + b[2]) * a[2],
                        ];
                        if region.contains(&coord) {
                            coords.push(coord);
                        }
                    }
                }
            }
        }
        coords
    }
}

/// Replicates `unitcell` `n` times along each axis into a periodic box
/// centered on the origin. Tags follow generation order.
pub fn create_lattice(unitcell: &UnitCell, n: [usize; 3]) -> Result<(Container, Atoms)> {
    if n.iter().any(|&ni| ni == 0) {
        return Err(Error::LatticeError(format!(
            "replication counts should be positive, found {:?}",
            n
        )));
    }
    let a = unitcell.cell_lengths();
    let lengths = [n[0] as f64 * a[0], n[1] as f64 * a[1], n[2] as f64 * a[2]];
    let rect = Rect::centered(lengths);

    let mut atoms = Atoms::new();
    let mut site_types = Vec::with_capacity(unitcell.basis().len());
    for site in 0..unitcell.basis().len() {
        let atom_type = AtomType::with_diameter(
            &unitcell.type_names()[site],
            unitcell.masses()[site],
            unitcell.diameters()[site],
        )?;
        site_types.push(atoms.add_atom_type(atom_type)?);
    }

    for i in 0..n[0] {
        for j in 0..n[1] {
            for k in 0..n[2] {
                for (site, b) in unitcell.basis().iter().enumerate() {
                    let coord = [
                        (i as f64 + b[0]) * a[0] - 0.5 * lengths[0],
                        (j as f64 + b[1]) * a[1] - 0.5 * lengths[1],
                        (k as f64 + b[2]) * a[2] - 0.5 * lengths[2],
                    ];
                    atoms.add_atoms(site_types[site], &[coord]);
                }
            }
        }
    }

    info!(
        "created lattice of {} particles in a {:.3} x {:.3} x {:.3} box",
        atoms.num_atoms(),
        lengths[0],
        lengths[1],
        lengths[2]
    );
    Ok((Container::from_rect_periodic(rect), atoms))
}
