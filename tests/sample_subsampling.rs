use casfig::core::table::Table;
use casfig::figures::fig2::{self, MAX_CURVES};

fn stability_csv(n_samples: usize, lmax: &[u32]) -> String {
    let mut csv = String::from("sample_id,Lmax,CAS\n");
    for s in (0..n_samples).rev() {
        for &l in lmax.iter().rev() {
            let cas = 1e-3 * (s + 1) as f64 / l as f64;
            csv.push_str(&format!("{s},{l},{cas}\n"));
        }
    }
    csv
}

#[test]
fn ten_samples_keep_first_eight_without_legend() {
    let csv = stability_csv(10, &[1, 2, 3]);
    let table = Table::from_reader(fig2::INPUT, csv.as_bytes()).unwrap();
    let data = fig2::prepare(&table).unwrap();
    assert_eq!(data.curves.len(), MAX_CURVES);
    assert!(!data.show_legend);
    let ids: Vec<&str> = data.curves.iter().map(|c| c.sample_id.as_str()).collect();
    assert_eq!(ids, vec!["0", "1", "2", "3", "4", "5", "6", "7"]);
}

#[test]
fn blank_ids_keep_numeric_order_and_draw_no_curve() {
    let mut csv = String::from("sample_id,Lmax,CAS\n");
    for s in 1..=10 {
        csv.push_str(&format!("{s},1,0.1\n{s},2,0.2\n"));
    }
    csv.push_str(",1,0.5\n,2,0.6\n");
    let table = Table::from_reader(fig2::INPUT, csv.as_bytes()).unwrap();
    let data = fig2::prepare(&table).unwrap();
    let ids: Vec<&str> = data.curves.iter().map(|c| c.sample_id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3", "4", "5", "6", "7", "8"]);
    assert!(data.curves.iter().all(|c| c.points.len() == 2));
}

#[test]
fn few_samples_get_a_legend_and_sorted_points() {
    let csv = stability_csv(3, &[1, 2, 4]);
    let table = Table::from_reader(fig2::INPUT, csv.as_bytes()).unwrap();
    let data = fig2::prepare(&table).unwrap();
    assert_eq!(data.curves.len(), 3);
    assert!(data.show_legend);
    let lmax: Vec<f64> = data.curves[0].points.iter().map(|p| p.0).collect();
    assert_eq!(lmax, vec![1.0, 2.0, 4.0]);
}

#[test]
fn seven_samples_are_all_drawn_but_unlabelled() {
    let csv = stability_csv(7, &[1, 2]);
    let table = Table::from_reader(fig2::INPUT, csv.as_bytes()).unwrap();
    let data = fig2::prepare(&table).unwrap();
    assert_eq!(data.curves.len(), 7);
    assert!(!data.show_legend);
}

#[test]
fn median_steps_are_keyed_by_upper_bound() {
    let csv = "sample_id,Lmax,CAS\nA,1,0.10\nA,2,0.20\nA,3,0.25\nB,1,0.10\nB,2,0.40\nC,1,0.5\nC,2,0.5\n";
    let table = Table::from_reader(fig2::INPUT, csv.as_bytes()).unwrap();
    let data = fig2::prepare(&table).unwrap();
    assert_eq!(data.median_steps.len(), 2);
    let (l2, d2) = data.median_steps[0];
    assert_eq!(l2, 2.0);
    // |diffs| at L=2 are 0.1, 0.3, 0.0 -> median 0.1
    assert!((d2 - 0.1).abs() < 1e-12);
    let (l3, d3) = data.median_steps[1];
    assert_eq!(l3, 3.0);
    assert!((d3 - 0.05).abs() < 1e-12);
}
