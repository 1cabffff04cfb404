//! Template-guided chirality assignment: match, align, transfer, validate.
//!
//! Each stage reads the previous stage's graph and produces a new one. A
//! [`Run`] keeps every generation so a caller can inspect where a molecule
//! ended up, and fails at most once.

use tracing::{debug, instrument, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::align::reorder;
use crate::atom::Atom;
use crate::bond::Bond;
use crate::config::StereoConfig;
use crate::error::{StereoError, StereoErrorKind};
use crate::mol::Mol;
use crate::query::{QueryAtom, QueryBond};
use crate::substruct::{AtomMapping, check_compatible, find_match_bounded};
use crate::traits::{
    HasAtomicNum, HasBondOrder, HasChirality, HasChiralityMut, HasElement, HasFormalCharge,
    HasHydrogenCount,
};
use crate::transfer::{self, check_tag_sources};
use crate::validate::{ValidatedGraph, finalize_with};

/// Where a run currently stands. Transitions are strictly linear; any stage
/// may instead end in `Failed`, which is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Unmatched,
    Mapped,
    Aligned,
    Tagged,
    Validated,
    Failed(StereoErrorKind),
}

impl Stage {
    pub fn is_terminal(self) -> bool {
        matches!(self, Stage::Validated | Stage::Failed(_))
    }
}

/// One molecule's pass through the pipeline, advanced a stage at a time.
///
/// The stage is read off which generations exist, so each step finds the
/// data it needs already in place.
pub struct Run<'a, A = Atom, B = Bond, QA = QueryAtom, QB = QueryBond> {
    target: &'a Mol<A, B>,
    query: &'a Mol<QA, QB>,
    config: &'a StereoConfig,
    mapping: Option<AtomMapping>,
    aligned: Option<Mol<A, B>>,
    tagged: Option<Mol<A, B>>,
    validated: Option<ValidatedGraph<A, B>>,
    error: Option<StereoError>,
}

/// What a single step produced.
enum Generation<A, B> {
    Mapped(AtomMapping),
    Aligned(Mol<A, B>),
    Tagged(Mol<A, B>),
    Validated(ValidatedGraph<A, B>),
}

impl<'a, A, B, QA, QB> Run<'a, A, B, QA, QB>
where
    A: Clone
        + HasElement
        + HasAtomicNum
        + HasChiralityMut
        + HasHydrogenCount
        + HasFormalCharge,
    B: Clone + HasBondOrder,
    QA: HasElement + HasChirality,
    QB: HasBondOrder,
{
    pub fn new(target: &'a Mol<A, B>, query: &'a Mol<QA, QB>, config: &'a StereoConfig) -> Self {
        Self {
            target,
            query,
            config,
            mapping: None,
            aligned: None,
            tagged: None,
            validated: None,
            error: None,
        }
    }

    pub fn stage(&self) -> Stage {
        if let Some(err) = &self.error {
            return Stage::Failed(err.kind());
        }
        match (&self.mapping, &self.aligned, &self.tagged, &self.validated) {
            (_, _, _, Some(_)) => Stage::Validated,
            (_, _, Some(_), None) => Stage::Tagged,
            (_, Some(_), None, None) => Stage::Aligned,
            (Some(_), None, None, None) => Stage::Mapped,
            (None, None, None, None) => Stage::Unmatched,
        }
    }

    pub fn target(&self) -> &Mol<A, B> {
        self.target
    }

    pub fn mapping(&self) -> Option<&AtomMapping> {
        self.mapping.as_ref()
    }

    /// The target with adjacency aligned to the query, once `Aligned`.
    pub fn aligned(&self) -> Option<&Mol<A, B>> {
        self.aligned.as_ref()
    }

    /// The aligned target carrying the query's tags, once `Tagged`.
    pub fn tagged(&self) -> Option<&Mol<A, B>> {
        self.tagged.as_ref()
    }

    pub fn validated(&self) -> Option<&ValidatedGraph<A, B>> {
        self.validated.as_ref()
    }

    pub fn error(&self) -> Option<&StereoError> {
        self.error.as_ref()
    }

    /// Runs the next stage and returns the stage reached.
    ///
    /// A validated run stays validated. A failed run reports its original
    /// error again without doing any work.
    pub fn advance(&mut self) -> Result<Stage, StereoError> {
        if let Some(err) = &self.error {
            return Err(err.clone());
        }
        let next = match (&self.mapping, &self.aligned, &self.tagged) {
            _ if self.validated.is_some() => return Ok(Stage::Validated),
            (None, _, _) => self.map().map(Generation::Mapped),
            (Some(mapping), None, _) => Ok(Generation::Aligned(reorder(
                self.target,
                mapping,
                self.query,
            ))),
            (Some(mapping), Some(aligned), None) => {
                transfer::apply(aligned, mapping, self.query).map(Generation::Tagged)
            }
            (Some(mapping), Some(_), Some(tagged)) => finalize_with(tagged.clone(), self.config)
                .map(|validated| Generation::Validated(validated.with_mapping(mapping.clone()))),
        };
        match next {
            Ok(generation) => {
                match generation {
                    Generation::Mapped(mapping) => self.mapping = Some(mapping),
                    Generation::Aligned(mol) => self.aligned = Some(mol),
                    Generation::Tagged(mol) => self.tagged = Some(mol),
                    Generation::Validated(validated) => self.validated = Some(validated),
                }
                let stage = self.stage();
                debug!(?stage, "stage complete");
                Ok(stage)
            }
            Err(err) => {
                warn!(from = ?self.stage(), %err, "run failed");
                self.error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Advances to the end and hands back the validated graph.
    pub fn finish(mut self) -> Result<ValidatedGraph<A, B>, StereoError> {
        loop {
            self.advance()?;
            if let Some(validated) = self.validated.take() {
                return Ok(validated);
            }
        }
    }

    fn map(&self) -> Result<AtomMapping, StereoError> {
        check_tag_sources(self.query)?;
        check_compatible(self.target, self.query)?;
        let mapping = find_match_bounded(self.target, self.query, self.config.max_search_steps)?
            .ok_or(StereoError::MatchNotFound)?;
        debug!(mapped = mapping.len(), "query embedded");
        Ok(mapping)
    }
}

/// Assigns chirality to `target` wherever `query` embeds in it, copying the
/// query's tags onto the matched atoms.
///
/// Either the whole run succeeds and every tagged query atom's image carries
/// its tag, or it fails with exactly one error and `target` is untouched.
#[instrument(skip_all, fields(target_atoms = target.atom_count(), query_atoms = query.atom_count()))]
pub fn assign_chirality_from_template<A, B, QA, QB>(
    target: &Mol<A, B>,
    query: &Mol<QA, QB>,
    config: &StereoConfig,
) -> Result<ValidatedGraph<A, B>, StereoError>
where
    A: Clone
        + HasElement
        + HasAtomicNum
        + HasChiralityMut
        + HasHydrogenCount
        + HasFormalCharge,
    B: Clone + HasBondOrder,
    QA: HasElement + HasChirality,
    QB: HasBondOrder,
{
    Run::new(target, query, config).finish()
}

/// Runs [`assign_chirality_from_template`] on every target against one
/// query. Results come back in input order; one target failing does not
/// affect the others.
#[instrument(skip_all, fields(targets = targets.len()))]
pub fn assign_chirality_batch<A, B, QA, QB>(
    targets: &[Mol<A, B>],
    query: &Mol<QA, QB>,
    config: &StereoConfig,
) -> Vec<Result<ValidatedGraph<A, B>, StereoError>>
where
    A: Clone
        + HasElement
        + HasAtomicNum
        + HasChiralityMut
        + HasHydrogenCount
        + HasFormalCharge
        + Send
        + Sync,
    B: Clone + HasBondOrder + Send + Sync,
    QA: HasElement + HasChirality + Sync,
    QB: HasBondOrder + Sync,
{
    #[cfg(not(feature = "parallel"))]
    let iterator = targets.iter();

    #[cfg(feature = "parallel")]
    let iterator = targets.par_iter();

    let results: Vec<_> = iterator
        .map(|target| assign_chirality_from_template(target, query, config))
        .collect();
    debug!(
        succeeded = results.iter().filter(|r| r.is_ok()).count(),
        "batch complete"
    );
    results
}
