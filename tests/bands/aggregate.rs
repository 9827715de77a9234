#[cfg(test)]
mod verify {
    use hepbands::bands::{self, AggregationError, OTHERS_COMPONENT, PLAIN_COMPONENTS};
    use hepbands::language::*;

    fn bin(min: f64, max: f64, xsec: f64, stat: f64, sources: &[(&str, f64)]) -> Bin {
        let mut bin = Bin::new(min, max, xsec, stat);
        for (name, value) in sources {
            bin.sources
                .insert(name.to_string(), *value);
        }
        bin
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    fn assert_close(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());
        for (a, b) in actual
            .iter()
            .zip(expected)
        {
            assert!(close(*a, *b), "{:?} != {:?}", actual, expected);
        }
    }

    /// Two bins, cross sections 10 and 20, where luminosity is 10% and the
    /// one other source is 20% of the cross section in both.
    fn scenario() -> Variable {
        let mut variable = Variable::new("pT_yy");
        variable
            .bins
            .push(bin(
                0.0,
                20.0,
                10.0,
                0.5,
                &[("lumi", 1.0), ("a", 2.0), ("fit", 0.0), ("bkg_model_uncorr", 0.0)],
            ));
        variable
            .bins
            .push(bin(
                20.0,
                45.0,
                20.0,
                1.0,
                &[("lumi", 2.0), ("a", 4.0), ("fit", 0.0), ("bkg_model_uncorr", 0.0)],
            ));
        variable
    }

    #[test]
    fn plain_scenario() {
        let set = bands::aggregate(&scenario(), Mode::Plain).unwrap();

        assert_eq!(set.name, "pT_yy");
        assert_eq!(set.components, PLAIN_COMPONENTS.to_vec());
        assert_eq!(set.edges, vec![0.0, 20.0, 45.0]);
        assert_eq!(set.bin_count(), 2);
        assert_eq!(set.bands.len(), 4);

        let expected = (0.1f64 * 0.1 + 0.2 * 0.2).sqrt();

        assert_close(&set.bands[0], &[0.1, 0.1]);
        assert_close(&set.bands[1], &[expected, expected]);
        // no signal extraction uncertainty, so nothing gets added
        assert_close(&set.bands[2], &[expected, expected]);
        assert_close(
            &set.bands[3],
            &[(5.0f64 + 0.25).sqrt() / 10.0, (20.0f64 + 1.0).sqrt() / 20.0],
        );
    }

    #[test]
    fn cumulative_invariant() {
        let mut variable = scenario();
        variable.bins[0]
            .sources
            .insert("fit".to_string(), 0.7);
        variable.bins[1]
            .sources
            .insert("bkg_model_uncorr".to_string(), 1.3);

        for mode in [Mode::Plain, Mode::Correlated] {
            let set = bands::aggregate(&variable, mode).unwrap();

            for j in 0..set.bin_count() {
                for i in 1..set
                    .bands
                    .len()
                {
                    assert!(set.bands[i][j] >= set.bands[i - 1][j]);
                }
            }
        }
    }

    #[test]
    fn correlated_selection() {
        let mut variable = Variable::new("m_jj");
        variable
            .bins
            .push(bin(
                0.0,
                1.0,
                1.0,
                0.01,
                &[
                    ("lumi", 0.9),
                    ("fit", 0.9),
                    ("a", 0.1),
                    ("b", 0.2),
                    ("c", 0.3),
                    ("d", 0.4),
                    ("e", 0.5),
                    ("f", 0.05),
                ],
            ));

        let set = bands::aggregate(&variable, Mode::Correlated).unwrap();

        assert_eq!(set.components, vec!["b", "c", "d", "e", OTHERS_COMPONENT]);

        let expected: Vec<f64> = [0.04f64, 0.13, 0.29, 0.54, 0.5525]
            .iter()
            .map(|x| x.sqrt())
            .collect();
        let actual: Vec<f64> = set
            .bands
            .iter()
            .map(|band| band[0])
            .collect();
        assert_close(&actual, &expected);
    }

    #[test]
    fn correlated_with_few_sources() {
        let set = bands::aggregate(&scenario(), Mode::Correlated).unwrap();

        // only "a" is eligible; the remainder is empty
        assert_eq!(set.components, vec!["a", OTHERS_COMPONENT]);
        assert_close(&set.bands[0], &[0.2, 0.2]);
        assert_close(&set.bands[1], &[0.2, 0.2]);
    }

    #[test]
    fn correlated_labels() {
        let mut variable = Variable::new("pT_yy");
        variable
            .bins
            .push(bin(
                0.0,
                1.0,
                1.0,
                0.01,
                &[("lumi", 0.5), ("PES", 0.3), ("iso", 0.1)],
            ));

        let set = bands::aggregate(&variable, Mode::Correlated).unwrap();
        assert_eq!(
            set.components,
            vec!["Isolation", "Photon energy scale", OTHERS_COMPONENT]
        );
        assert_eq!(bands::source_label("jes"), "jes");
    }

    #[test]
    fn missing_source() {
        let mut variable = scenario();
        variable.bins[1]
            .sources
            .remove("fit");

        let error = bands::aggregate(&variable, Mode::Plain).unwrap_err();
        assert_eq!(
            error,
            AggregationError::MissingSource {
                variable: "pT_yy".to_string(),
                source: "fit".to_string(),
                bin: 1,
                context: "bin [20, 45)".to_string(),
            }
        );
        assert_eq!(
            error.message(),
            "no uncertainty source 'fit' in bin [20, 45) of pT_yy (bin 2)"
        );

        let mut variable = scenario();
        variable.bins[0]
            .sources
            .remove("a");

        let error = bands::aggregate(&variable, Mode::Correlated).unwrap_err();
        assert_eq!(
            error,
            AggregationError::MissingSource {
                variable: "pT_yy".to_string(),
                source: "a".to_string(),
                bin: 0,
                context: "bin [0, 20)".to_string(),
            }
        );
    }

    #[test]
    fn zero_cross_section() {
        let mut variable = scenario();
        variable.bins[1].xsec = 0.0;

        let error = bands::aggregate(&variable, Mode::Plain).unwrap_err();
        assert_eq!(
            error,
            AggregationError::ZeroCrossSection {
                variable: "pT_yy".to_string(),
                bin: 1,
            }
        );
        assert_eq!(error.message(), "zero cross section in bin 2 of pT_yy");
    }

    #[test]
    fn dataset_skips_empty_variables() {
        let mut dataset = Dataset::new();
        dataset
            .variables
            .insert("pT_yy".to_string(), scenario());
        dataset
            .variables
            .insert("empty".to_string(), Variable::new("empty"));

        assert_eq!(
            bands::aggregate(&Variable::new("empty"), Mode::Plain),
            Err(AggregationError::NoBins("empty".to_string()))
        );

        let sets = bands::aggregate_dataset(&dataset, Mode::Plain).unwrap();
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].name, "pT_yy");
    }
}
