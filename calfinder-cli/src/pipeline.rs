//! Three-stage calcyanin annotation: triplication, glycine zippers, N-ter

use crate::report::{write_features, write_summary, OutputLayout};
use anyhow::{Context, Result};
use calfinder_bio::annotation::{
    deoverlap, filter_domains, group_by_target, select_nearest, sort_tuples, summarize,
    DomainTuple, Hit, NterMapping, ProfileHits, SummaryRow, TargetView, TriplicationCall,
};
use calfinder_bio::formats::write_fasta;
use calfinder_bio::sequence::Sequence;
use calfinder_core::{CalfError, Config};
use calfinder_tools::{Aligner, ProfileSearcher, SearchOptions};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info, warn};

/// Counts reported at the end of a run and saved as `run.json`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    pub sequences: usize,
    /// Targets with any triplication profile hit
    pub triplication_hits: usize,
    /// Sequences passing the triplication gate
    pub triplication_positive: usize,
    pub glyzip_domains: usize,
    pub nter_hits: usize,
    pub summarized: usize,
    pub trusted: usize,
    pub flags: BTreeMap<String, usize>,
}

impl RunSummary {
    fn record_rows(&mut self, rows: &[SummaryRow]) {
        self.summarized = rows.len();
        self.trusted = rows.iter().filter(|r| r.is_trusted()).count();
        for row in rows {
            *self.flags.entry(row.flag.label().to_string()).or_default() += 1;
        }
    }
}

pub struct Pipeline<S, A> {
    config: Config,
    searcher: S,
    aligner: A,
}

impl<S: ProfileSearcher, A: Aligner> Pipeline<S, A> {
    pub fn new(config: Config, searcher: S, aligner: A) -> Self {
        Self {
            config,
            searcher,
            aligner,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn searcher(&self) -> &S {
        &self.searcher
    }

    pub fn aligner(&self) -> &A {
        &self.aligner
    }

    fn search_options(&self) -> SearchOptions {
        SearchOptions {
            threads: self.config.search.threads,
            dom_z: self.config.search.dom_z,
        }
    }

    fn write_stage(&self, layout: &OutputLayout, stage: &str, hits: &[Hit]) -> Result<()> {
        if self.config.output.write_intermediates {
            let path = layout.intermediate(stage);
            write_features(&path, hits)
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
        Ok(())
    }

    /// Run every stage over `sequences` and write all reports under `layout`
    pub fn run(&mut self, sequences: &[Sequence], layout: &OutputLayout) -> Result<RunSummary> {
        layout.create()?;
        let mut summary = RunSummary {
            sequences: sequences.len(),
            ..RunSummary::default()
        };
        let order: HashMap<&str, usize> = sequences
            .iter()
            .enumerate()
            .map(|(i, s)| (s.id.as_str(), i))
            .collect();

        info!("Searching glycine triplication in {} sequences", sequences.len());
        let calls = self.find_triplications(sequences, &order)?;
        summary.triplication_hits = calls.len();
        info!("{} sequences with a glycine triplication hit", calls.len());

        if calls.is_empty() {
            info!("No calcyanin found");
            self.finish(layout, &[], &mut summary)?;
            return Ok(summary);
        }

        let cter_hits: Vec<Hit> = calls.iter().map(TriplicationCall::to_hit).collect();
        self.write_stage(layout, "calglyx3", &cter_hits)?;

        let min_coverage = self.config.triplication.coverage;
        let positive: Vec<Sequence> = sequences
            .iter()
            .filter(|s| {
                calls
                    .iter()
                    .any(|c| c.seqid == s.id && c.passes(min_coverage))
            })
            .cloned()
            .collect();
        summary.triplication_positive = positive.len();
        info!(
            "{} sequences pass the triplication gate (coverage > {})",
            positive.len(),
            min_coverage
        );

        if positive.is_empty() {
            info!("No calcyanin found");
            self.finish(layout, &cter_hits, &mut summary)?;
            return Ok(summary);
        }

        let glyzip_hits = self.annotate_glyzips(&positive)?;
        summary.glyzip_domains = glyzip_hits.len();
        info!("{} glycine zipper domains annotated", glyzip_hits.len());
        self.write_stage(layout, "calglyzip", &glyzip_hits)?;

        let fasta = layout.glyx3_fasta();
        write_fasta(&fasta, &positive)
            .with_context(|| format!("Failed to write {}", fasta.display()))?;

        let nter_hits = self.annotate_nter(&fasta)?;
        summary.nter_hits = nter_hits.len();
        info!("Similar N-ter found for {} sequences", nter_hits.len());
        self.write_stage(layout, "calnter", &nter_hits)?;

        let mut features = cter_hits;
        features.extend(glyzip_hits);
        features.extend(nter_hits);
        self.finish(layout, &features, &mut summary)?;
        Ok(summary)
    }

    /// Stage 1: one call per target, in input order
    fn find_triplications(
        &mut self,
        sequences: &[Sequence],
        order: &HashMap<&str, usize>,
    ) -> Result<Vec<TriplicationCall>> {
        if sequences.is_empty() {
            warn!("No input sequences to search");
            return Ok(Vec::new());
        }

        let profile = self.config.triplication.profile_path();
        let options = self.search_options();
        let results = self
            .searcher
            .search(sequences, std::slice::from_ref(&profile), &options)
            .with_context(|| format!("Triplication search with {} failed", profile.display()))?;

        let gate = self.config.triplication.evalue;
        let i_evalue = self.config.triplication.i_evalue;
        let mut calls: Vec<TriplicationCall> = results
            .iter()
            .flat_map(|ph| {
                ph.hits
                    .iter()
                    .filter_map(move |hit| TriplicationCall::from_hit(hit, &ph.profile, gate, i_evalue))
            })
            .collect();
        calls.sort_by_key(|c| order.get(c.seqid.as_str()).copied().unwrap_or(usize::MAX));

        for call in calls.iter().filter(|c| !c.significant) {
            debug!(
                "{}: triplication E-value {:e} above gate, reported only",
                call.seqid, call.evalue
            );
        }
        Ok(calls)
    }

    /// Stage 2: deoverlapped and filtered zipper domains, in input order
    fn annotate_glyzips(&mut self, sequences: &[Sequence]) -> Result<Vec<Hit>> {
        let profiles = self.config.glyzip.profile_paths();
        let options = self.search_options();
        let results: Vec<ProfileHits> = self
            .searcher
            .search(sequences, &profiles, &options)
            .context("Glycine zipper search failed")?;

        let views = group_by_target(&results);
        let by_target: HashMap<&str, &TargetView<'_>> =
            views.iter().map(|v| (v.target, v)).collect();

        let evalue = self.config.glyzip.evalue;
        let i_evalue = self.config.glyzip.i_evalue;
        let min_coverage = self.config.glyzip.min_coverage;

        let per_sequence: Vec<Vec<Hit>> = sequences
            .par_iter()
            .map(|seq| {
                let Some(view) = by_target.get(seq.id.as_str()) else {
                    return Vec::new();
                };
                let mut tuples: Vec<DomainTuple> = view
                    .hits
                    .iter()
                    .filter(|(_, hit)| hit.evalue < evalue)
                    .flat_map(|(profile, hit)| {
                        hit.domains
                            .iter()
                            .filter(|d| d.i_evalue < i_evalue)
                            .map(move |d| DomainTuple::from_alignment(&profile.profile, d))
                    })
                    .collect();
                sort_tuples(&mut tuples);
                filter_domains(deoverlap(&seq.id, seq.len(), &tuples), min_coverage)
            })
            .collect();

        Ok(per_sequence.into_iter().flatten().collect())
    }

    /// Stage 3: nearest known N-terminal region for each positive sequence.
    ///
    /// Unreadable aligner output means no N-ter labels; a failed run is fatal.
    fn annotate_nter(&mut self, query: &std::path::Path) -> Result<Vec<Hit>> {
        let mapping_path = self.config.nter.mapping_path();
        let mapping = NterMapping::load(&mapping_path)
            .with_context(|| format!("Failed to load N-ter mapping {}", mapping_path.display()))?;
        debug!("{} N-ter references mapped", mapping.len());

        let database = self.config.nter.database_path();
        let evalue = self.config.nter.evalue;
        info!("Searching similar N-ter in {}", database.display());

        let alignments = match self.aligner.align(query, &database, evalue) {
            Ok(alignments) => alignments,
            Err(err) => match err.downcast_ref::<CalfError>() {
                Some(CalfError::Parse(msg)) => {
                    warn!("Ignoring unreadable N-ter alignment output: {}", msg);
                    Vec::new()
                }
                _ => return Err(err.context("N-ter alignment failed")),
            },
        };
        if alignments.is_empty() {
            warn!("No N-ter alignment reported");
        }

        Ok(select_nearest(
            &alignments,
            &mapping,
            evalue,
            self.config.nter.coverage,
        ))
    }

    fn finish(&self, layout: &OutputLayout, features: &[Hit], summary: &mut RunSummary) -> Result<()> {
        write_features(layout.features(), features)?;

        let rows = summarize(features);
        write_summary(layout.summary(), &rows)?;
        summary.record_rows(&rows);
        info!(
            "{} reliable calcyanin found out of {} summarized sequences",
            summary.trusted, summary.summarized
        );

        let json = serde_json::to_string_pretty(summary)?;
        std::fs::write(layout.run_json(), json)
            .with_context(|| format!("Failed to write {}", layout.run_json().display()))?;
        Ok(())
    }
}
