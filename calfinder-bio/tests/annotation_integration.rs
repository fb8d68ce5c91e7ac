/// Property and end-to-end tests for the annotation core
use calfinder_bio::annotation::{
    deoverlap, filter_domains, group_by_target, sort_tuples, summarize, DomainAlignment,
    DomainTuple, Flag, ProfileHits, TargetHit,
};
use proptest::prelude::*;

fn arb_tuples(seq_len: usize) -> impl Strategy<Value = Vec<DomainTuple>> {
    let labels = prop::sample::select(vec!["Gly1", "Gly2", "Gly3"]);
    prop::collection::vec(
        (0u32..1000, labels, 0..seq_len, 1usize..60, 10usize..80),
        0..8,
    )
    .prop_map(move |raw| {
        raw.into_iter()
            .map(|(exp, label, start, width, profile_length)| DomainTuple {
                evalue: 10f64.powi(-(exp as i32 % 50)) * (1.0 + exp as f64 / 1000.0),
                domain: label.to_string(),
                start,
                end: (start + width).min(seq_len + 5),
                profile_length,
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn deoverlap_partitions_the_sequence(
        (seq_len, mut tuples) in (1usize..300).prop_flat_map(|l| (Just(l), arb_tuples(l)))
    ) {
        sort_tuples(&mut tuples);
        let hits = deoverlap("seq", seq_len, &tuples);

        prop_assert!(!hits.is_empty());
        prop_assert_eq!(hits[0].start, 1);
        prop_assert_eq!(hits[hits.len() - 1].end, seq_len);
        for pair in hits.windows(2) {
            prop_assert_eq!(pair[0].end + 1, pair[1].start);
            prop_assert_ne!(pair[0].domid.as_deref(), pair[1].domid.as_deref());
        }
        for hit in &hits {
            prop_assert!(hit.start <= hit.end);
            prop_assert_eq!(hit.domid.is_none(), hit.coverage.is_none());
        }
        prop_assert_eq!(hits.iter().map(|h| h.span_len()).sum::<usize>(), seq_len);
    }

    #[test]
    fn every_residue_gets_the_lowest_evalue_label(
        (seq_len, mut tuples) in (1usize..200).prop_flat_map(|l| (Just(l), arb_tuples(l)))
    ) {
        sort_tuples(&mut tuples);
        let hits = deoverlap("seq", seq_len, &tuples);

        for hit in &hits {
            for residue in hit.start..=hit.end {
                let pos = residue - 1;
                let covering: Vec<&DomainTuple> = tuples
                    .iter()
                    .filter(|t| t.start <= pos && pos < t.end)
                    .collect();
                match covering.iter().map(|t| t.evalue).reduce(f64::min) {
                    None => prop_assert!(hit.domid.is_none()),
                    Some(best) => {
                        let first = covering[0];
                        prop_assert_eq!(first.evalue, best);
                        prop_assert_eq!(hit.domid.as_deref(), Some(first.domain.as_str()));
                    }
                }
            }
        }
    }

    #[test]
    fn filter_keeps_an_ordered_labelled_subsequence(
        (seq_len, mut tuples) in (1usize..300).prop_flat_map(|l| (Just(l), arb_tuples(l))),
        min_coverage in 0.0f64..1.0
    ) {
        sort_tuples(&mut tuples);
        let hits = deoverlap("seq", seq_len, &tuples);
        let kept = filter_domains(hits.clone(), min_coverage);

        prop_assert!(kept.len() <= hits.len());
        prop_assert!(kept.iter().all(|h| !h.is_linker() && h.coverage.unwrap() >= min_coverage));
        prop_assert!(kept.windows(2).all(|w| w[0].end < w[1].start));
        prop_assert!(kept.iter().all(|k| hits.contains(k)));
    }
}

fn alignment(i_evalue: f64, from: usize, to: usize, profile_length: usize) -> DomainAlignment {
    DomainAlignment {
        i_evalue,
        ali_from: from,
        ali_to: to,
        hmm_from: 1,
        hmm_to: to - from + 1,
        profile_length,
    }
}

#[test]
fn test_glyzip_resolution_to_summary() {
    let results = vec![
        ProfileHits {
            profile: "Gly1".to_string(),
            profile_length: 30,
            hits: vec![TargetHit {
                target: "calA".to_string(),
                evalue: 1e-12,
                domains: vec![alignment(1e-12, 101, 130, 30)],
            }],
        },
        ProfileHits {
            profile: "Gly2".to_string(),
            profile_length: 30,
            hits: vec![TargetHit {
                target: "calA".to_string(),
                evalue: 1e-9,
                domains: vec![alignment(1e-9, 125, 160, 30)],
            }],
        },
        ProfileHits {
            profile: "Gly3".to_string(),
            profile_length: 30,
            hits: vec![TargetHit {
                target: "calA".to_string(),
                evalue: 1e-10,
                domains: vec![alignment(1e-10, 171, 200, 30)],
            }],
        },
    ];

    let views = group_by_target(&results);
    assert_eq!(views.len(), 1);

    let mut tuples: Vec<DomainTuple> = views[0]
        .hits
        .iter()
        .flat_map(|(profile, hit)| {
            hit.domains
                .iter()
                .map(move |d| DomainTuple::from_alignment(&profile.profile, d))
        })
        .collect();
    sort_tuples(&mut tuples);

    let hits = filter_domains(deoverlap("calA", 240, &tuples), 0.65);
    let labels: Vec<(&str, usize, usize)> =
        hits.iter().map(|h| (h.label(), h.start, h.end)).collect();
    assert_eq!(
        labels,
        vec![("Gly1", 101, 130), ("Gly2", 131, 160), ("Gly3", 171, 200)]
    );

    let rows = summarize(&hits);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].cter, "Gly1,Gly2,Gly3");
    assert_eq!(rows[0].flag, Flag::CalcyaninNewNter);
}
