use ndarray::{Array2, Zip};

/// Zero population wherever the co-located urban mask is
/// `0`. Other mask values (including `1` and any nodata
/// sentinel) leave the population untouched.
///
/// # Panics
///
/// Panics if the buffers differ in shape.
pub fn mask_population(population: &Array2<f64>, urban: &Array2<f64>) -> Array2<f64> {
    let mut masked = population.clone();
    mask_population_in_place(&mut masked, urban);
    masked
}

/// In-place variant of [`mask_population`] for buffers that
/// are owned by the sweep.
pub fn mask_population_in_place(population: &mut Array2<f64>, urban: &Array2<f64>) {
    assert_eq!(
        population.dim(),
        urban.dim(),
        "population and urban windows differ in shape"
    );
    Zip::from(population).and(urban).for_each(|p, &u| {
        if u == 0. {
            *p = 0.;
        }
    });
}
