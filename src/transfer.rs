//! Copying chirality tags from a query onto an aligned target.

use tracing::{debug, instrument};

use crate::error::StereoError;
use crate::mol::Mol;
use crate::substruct::AtomMapping;
use crate::traits::{HasChirality, HasChiralityMut};

/// Rejects queries with a tagged atom that lacks 3–4 neighbors.
pub fn check_tag_sources<QA, QB>(query: &Mol<QA, QB>) -> Result<(), StereoError>
where
    QA: HasChirality,
{
    for idx in query.atoms() {
        if !query.atom(idx).chirality().is_defined() {
            continue;
        }
        let degree = query.degree(idx);
        if !(3..=4).contains(&degree) {
            return Err(StereoError::InvalidTagSource {
                atom: idx.index(),
                degree,
            });
        }
    }
    Ok(())
}

/// Sets each mapped target atom's tag to its query atom's tag, wherever the
/// query tag is defined.
///
/// The copy is verbatim, which is only sound once
/// [`reorder`](crate::align::reorder) has aligned the target's adjacency to
/// the query. Atoms outside the mapped image, and mapped atoms whose query
/// atom is untagged, keep their tag. Returns a new generation.
#[instrument(skip_all)]
pub fn apply<A, B, QA, QB>(
    aligned: &Mol<A, B>,
    mapping: &AtomMapping,
    query: &Mol<QA, QB>,
) -> Result<Mol<A, B>, StereoError>
where
    A: Clone + HasChiralityMut,
    B: Clone,
    QA: HasChirality,
{
    check_tag_sources(query)?;

    let mut tagged = 0usize;
    let next = aligned.map_atoms(|idx, atom| {
        let mut atom = atom.clone();
        if let Some(q) = mapping.query(idx) {
            let tag = query.atom(q).chirality();
            if tag.is_defined() {
                atom.set_chirality(tag);
                tagged += 1;
            }
        }
        atom
    });
    debug!(tagged, "transferred chirality tags");
    Ok(next)
}
