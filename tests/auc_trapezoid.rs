use approx::assert_relative_eq;
use casfig::core::stats::auc_trapezoid;

#[test]
fn diagonal_has_half_area() {
    assert_relative_eq!(auc_trapezoid(&[0.0, 1.0], &[0.0, 1.0]), 0.5, epsilon = 1e-12);
}

#[test]
fn perfect_classifier_has_unit_area() {
    let auc = auc_trapezoid(&[0.0, 0.0, 1.0], &[0.0, 1.0, 1.0]);
    assert_relative_eq!(auc, 1.0, epsilon = 1e-12);
}

#[test]
fn input_order_does_not_matter() {
    let fpr = [0.0, 0.1, 0.3, 0.6, 1.0];
    let tpr = [0.0, 0.4, 0.7, 0.9, 1.0];
    let sorted = auc_trapezoid(&fpr, &tpr);

    let shuffled_fpr = [0.6, 0.0, 1.0, 0.3, 0.1];
    let shuffled_tpr = [0.9, 0.0, 1.0, 0.7, 0.4];
    let shuffled = auc_trapezoid(&shuffled_fpr, &shuffled_tpr);
    assert_relative_eq!(sorted, shuffled, epsilon = 1e-12);
    assert!(sorted > 0.5 && sorted < 1.0);
}

#[test]
fn fewer_than_two_points_have_no_area() {
    assert_eq!(auc_trapezoid(&[], &[]), 0.0);
    assert_eq!(auc_trapezoid(&[0.3], &[0.8]), 0.0);
}
