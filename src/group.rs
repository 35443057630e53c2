use std::ops::Range;

use crate::{Atoms, Error, Result};

/// A static selection of particles, identified by tag
#[derive(Clone, Debug, PartialEq)]
pub struct Group {
    name: String,
    tags: Vec<usize>,
}
impl Group {
    /// Every particle present when the group is created
    pub fn all(atoms: &Atoms) -> Self {
        let mut tags = atoms.tags().to_vec();
        tags.sort_unstable();
        Self {
            name: String::from("all"),
            tags,
        }
    }
    pub fn of_type(atoms: &Atoms, type_name: &str) -> Result<Self> {
        let type_id = atoms
            .type_id(type_name)
            .ok_or_else(|| Error::GroupError(format!("unknown particle type {}", type_name)))?;
        let mut tags: Vec<usize> = atoms
            .tags()
            .iter()
            .zip(atoms.types())
            .filter_map(|(&tag, &t)| (t == type_id).then_some(tag))
            .collect();
        tags.sort_unstable();
        Ok(Self {
            name: format!("type {}", type_name),
            tags,
        })
    }
    /// Particles with tags in the half-open range
    pub fn tags(name: &str, atoms: &Atoms, range: Range<usize>) -> Result<Self> {
        if range.is_empty() {
            return Err(Error::GroupError(format!("group {} has an empty tag range", name)));
        }
        let mut tags: Vec<usize> = atoms
            .tags()
            .iter()
            .copied()
            .filter(|t| range.contains(t))
            .collect();
        tags.sort_unstable();
        Ok(Self {
            name: name.to_string(),
            tags,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
    /// Member tags in ascending order
    pub fn member_tags(&self) -> &[usize] {
        &self.tags
    }
    pub fn len(&self) -> usize {
        self.tags.len()
    }
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
    pub fn contains(&self, tag: usize) -> bool {
        self.tags.binary_search(&tag).is_ok()
    }
    /// Current storage indices of the members, in tag order
    pub fn indices(&self, atoms: &Atoms) -> Vec<usize> {
        let rtag = atoms.tag_to_idx();
        self.tags
            .iter()
            .filter_map(|&tag| rtag.get(tag).copied().filter(|&i| i != usize::MAX))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AtomType;

    fn atoms() -> Atoms {
        let mut atoms = Atoms::new();
        let a = atoms.add_atom_type(AtomType::new("A", 1.0).unwrap()).unwrap();
        let b = atoms.add_atom_type(AtomType::new("B", 1.0).unwrap()).unwrap();
        atoms.add_atoms(a, &[[0.0; 3], [1.0, 0.0, 0.0]]);
        atoms.add_atoms(b, &[[2.0, 0.0, 0.0]]);
        atoms.add_atoms(a, &[[3.0, 0.0, 0.0]]);
        atoms
    }

    #[test]
    fn selects_by_type_and_tag() {
        let atoms = atoms();
        assert_eq!(Group::all(&atoms).member_tags(), &[0, 1, 2, 3]);
        assert_eq!(Group::of_type(&atoms, "A").unwrap().member_tags(), &[0, 1, 3]);
        assert_eq!(Group::tags("mid", &atoms, 1..3).unwrap().member_tags(), &[1, 2]);
        assert!(Group::of_type(&atoms, "C").is_err());
        assert!(Group::tags("none", &atoms, 2..2).is_err());
    }

    #[test]
    fn indices_follow_sorted_storage() {
        let mut atoms = atoms();
        atoms.sort_atoms_by_bin(&[3, 2, 1, 0]);
        let group = Group::of_type(&atoms, "A").unwrap();
        assert!(group.contains(3) && !group.contains(2));
        assert_eq!(group.indices(&atoms), vec![3, 2, 0]);
    }
}
