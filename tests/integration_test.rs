//! End-to-end pipeline tests: fetch → generate → simulate → report views.

mod common;

use approx::relative_eq;
use common::*;
use crosstrader::domain::analysis::{analyze, AnalysisSummary};
use crosstrader::domain::error::CrosstraderError;
use crosstrader::domain::series::TradeSide;
use crosstrader::domain::signal::generate;
use crosstrader::domain::simulator::{simulate, simulate_with, OverdraftPolicy, SimulationConfig};
use crosstrader::domain::symbols::SymbolDirectory;
use crosstrader::ports::data_port::DataPort;
use proptest::prelude::*;

mod full_pipeline {
    use super::*;

    #[test]
    fn mock_port_feeds_the_analysis() {
        let port = MockDataPort::new()
            .with_bars("AAPL", make_bars("AAPL", &[10.0, 10.0, 10.0, 20.0, 10.0]));

        let bars = port
            .fetch_ohlcv("AAPL", date(2024, 1, 1), date(2024, 1, 5))
            .unwrap();
        assert_eq!(bars.len(), 5);

        let series = analyze(bars, 2, 3, 100.0).unwrap();

        assert_eq!(series.signal, vec![0, 0, 0, 1, 1]);
        assert_eq!(series.position, vec![0, 0, 0, 1, 0]);
        assert_eq!(series.quantity, vec![0, 0, 0, 5, 0]);
        assert_eq!(series.holdings, vec![0, 0, 0, 5, 5]);
        assert!((series.cash[3] - 0.0).abs() < 1e-9);
        assert!((series.total_value[4] - 50.0).abs() < 1e-9);
    }

    #[test]
    fn empty_fetch_maps_to_insufficient_data() {
        let port = MockDataPort::new();
        let bars = port
            .fetch_ohlcv("NOPE", date(2024, 1, 1), date(2024, 1, 5))
            .unwrap();
        assert!(bars.is_empty());

        let err = analyze(bars, 2, 3, 100.0).unwrap_err();
        assert!(matches!(err, CrosstraderError::InsufficientData { .. }));
    }

    #[test]
    fn port_errors_surface_to_the_caller() {
        let port = MockDataPort::new().with_error("BAD", "connection reset");
        let err = port
            .fetch_ohlcv("BAD", date(2024, 1, 1), date(2024, 1, 5))
            .unwrap_err();
        assert!(matches!(err, CrosstraderError::Data { .. }));
    }

    #[test]
    fn analysis_is_deterministic() {
        let closes: Vec<f64> = (0..60)
            .map(|i| 80.0 + 15.0 * ((i as f64) * 0.45).sin())
            .collect();
        let bars = make_bars("AAPL", &closes);

        let a = analyze(bars.clone(), 5, 12, 10_000.0).unwrap();
        let b = analyze(bars, 5, 12, 10_000.0).unwrap();
        assert_eq!(a, b);
    }
}

mod signal_behavior {
    use super::*;

    #[test]
    fn flat_prices_never_trade() {
        let series = analyze(make_bars("FLAT", &[42.0; 20]), 3, 7, 1_000.0).unwrap();

        assert!(series.position.iter().all(|&p| p == 0));
        assert!(series.quantity.iter().all(|&q| q == 0));
        assert!(series
            .total_value
            .iter()
            .all(|&v| (v - 1_000.0).abs() < 1e-9));
    }

    #[test]
    fn long_window_beyond_series_stays_flat() {
        let series = analyze(make_bars("SHORT", &[10.0, 20.0, 30.0, 40.0]), 2, 50, 1_000.0)
            .unwrap();

        assert!(series.long_ma.iter().all(Option::is_none));
        assert!(series.position.iter().all(|&p| p == 0));
        assert!(series
            .total_value
            .iter()
            .all(|&v| (v - 1_000.0).abs() < 1e-9));
    }

    #[test]
    fn round_trip_buy_then_sell() {
        // Rally into a crossover, then collapse back under the long average.
        let closes = [10.0, 10.0, 10.0, 20.0, 10.0, 10.0, 10.0];
        let series = analyze(make_bars("RT", &closes), 2, 3, 100.0).unwrap();

        let buys: Vec<usize> = (0..series.len()).filter(|&i| series.position[i] == 1).collect();
        let sells: Vec<usize> = (0..series.len())
            .filter(|&i| series.position[i] == -1)
            .collect();
        assert_eq!(buys, vec![3]);
        assert_eq!(sells, vec![5]);

        // Bought 5 @ 20, sold 5 @ 10.
        assert_eq!(series.quantity[3], 5);
        assert_eq!(series.quantity[5], -5);
        assert_eq!(series.holdings[5], 0);
        assert!((series.cash[5] - 50.0).abs() < 1e-9);
        assert!((series.total_value[6] - 50.0).abs() < 1e-9);
    }
}

mod trade_views {
    use super::*;

    #[test]
    fn trade_log_labels_and_sizes() {
        let closes = [10.0, 10.0, 10.0, 20.0, 10.0, 10.0, 10.0];
        let series = analyze(make_bars("RT", &closes), 2, 3, 100.0).unwrap();
        let log = series.trade_log();

        assert_eq!(log.len(), 2);
        assert_eq!(log[0].side, TradeSide::Buy);
        assert_eq!(log[0].side.label(), "buy");
        assert_eq!(log[0].date, date(2024, 1, 4));
        assert!((log[0].price - 20.0).abs() < 1e-9);
        assert_eq!(log[0].size, 5);

        assert_eq!(log[1].side, TradeSide::Sell);
        assert_eq!(log[1].size, 5);
    }

    #[test]
    fn summary_tracks_the_equity_curve() {
        let closes = [10.0, 10.0, 10.0, 20.0, 10.0, 10.0, 10.0];
        let series = analyze(make_bars("RT", &closes), 2, 3, 100.0).unwrap();
        let summary = AnalysisSummary::compute(&series, 100.0);

        assert!((summary.final_value - 50.0).abs() < 1e-9);
        assert!((summary.total_return_pct - (-50.0)).abs() < 1e-9);
        assert_eq!(summary.trades, 2);
    }
}

mod overdraft {
    use super::*;

    fn overdraft_series() -> crosstrader::domain::series::AnalyzedSeries {
        // cash 100 against a 200 close on the buy bar: base_quantity is 0
        // and the sizing floor forces a single share.
        let mut series = generate(make_bars("OD", &[100.0, 200.0, 200.0]), 2, 3).unwrap();
        series.position = vec![0, 1, 0];
        series.short_slope = vec![None, Some(1.0), None];
        series.long_slope = vec![None, Some(1.0), None];
        series
    }

    #[test]
    fn permit_lets_cash_go_negative() {
        let series = simulate(overdraft_series(), 100.0).unwrap();

        assert_eq!(series.quantity[1], 1);
        assert!((series.cash[1] - (-100.0)).abs() < 1e-9);
        // The account still marks to market consistently.
        assert!((series.total_value[1] - 100.0).abs() < 1e-9);
    }

    #[test]
    fn cap_at_cash_skips_the_trade() {
        let config = SimulationConfig {
            initial_investment: 100.0,
            overdraft: OverdraftPolicy::CapAtCash,
        };
        let series = simulate_with(overdraft_series(), &config).unwrap();

        assert_eq!(series.quantity[1], 0);
        assert_eq!(series.holdings[1], 0);
        assert!((series.cash[1] - 100.0).abs() < 1e-9);
    }
}

mod symbol_directory {
    use super::*;

    #[test]
    fn directory_backs_the_search_flow() {
        let dir = SymbolDirectory::from_json(
            r#"{"AAPL": "Apple Inc.", "MSFT": "Microsoft Corporation", "600519": "Kweichow Moutai"}"#,
        )
        .unwrap();

        assert_eq!(dir.len(), 3);
        assert_eq!(dir.name_of("600519"), Some("Kweichow Moutai"));

        let matches = dir.search("apple", 5);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].code, "AAPL");
    }
}

mod invariants {
    use super::*;

    fn window_pair() -> impl Strategy<Value = (usize, usize)> {
        (1usize..5, 2usize..10).prop_filter("short < long", |(s, l)| s < l)
    }

    proptest! {
        #[test]
        fn account_invariants_hold(
            closes in prop::collection::vec(1.0f64..500.0, 5..50),
            (short, long) in window_pair(),
            initial in 100.0f64..50_000.0,
        ) {
            let series = analyze(make_bars("PROP", &closes), short, long, initial).unwrap();
            let n = series.len();

            for i in 0..n {
                // position is always a unit step
                prop_assert!((-1..=1).contains(&series.position[i]));

                // conservation: total value is cash plus marked holdings
                let marked = series.cash[i] + series.holdings[i] as f64 * closes[i];
                prop_assert!((series.total_value[i] - marked).abs() < 1e-9);

                // a sell empties the book
                if series.position[i] == -1 {
                    prop_assert_eq!(series.holdings[i], 0);
                }

                if i == 0 {
                    continue;
                }

                // between trades, equity moves only with the price
                if series.quantity[i] == 0 {
                    let delta = series.total_value[i] - series.total_value[i - 1];
                    let price_move = series.holdings[i - 1] as f64 * (closes[i] - closes[i - 1]);
                    prop_assert!(relative_eq!(delta, price_move, epsilon = 1e-6, max_relative = 1e-9));
                }

                // buys respect the sizing bounds derived from prior cash
                if series.position[i] == 1 && series.quantity[i] != 0 {
                    let base = (series.cash[i - 1] / closes[i]).floor() as i64;
                    let min_q = 1.max((base as f64 * 0.1).floor() as i64);
                    let max_q = ((base as f64 * 1.5).floor() as i64).min(base);
                    prop_assert!(series.quantity[i] >= min_q);
                    prop_assert!(series.quantity[i] <= max_q.max(min_q));
                }
            }
        }

        #[test]
        fn analysis_is_pure(
            closes in prop::collection::vec(1.0f64..500.0, 5..30),
        ) {
            let a = analyze(make_bars("P", &closes), 2, 4, 1_000.0).unwrap();
            let b = analyze(make_bars("P", &closes), 2, 4, 1_000.0).unwrap();
            prop_assert_eq!(a, b);
        }
    }
}
