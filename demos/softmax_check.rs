use rand::{rngs::StdRng, SeedableRng};
use softmax_linear::{
    grad_check_sparse, softmax_loss_naive, softmax_loss_vectorized, GradCheckConfig, Matrix,
    SoftmaxImpl, SoftmaxLoss,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut rng = StdRng::seed_from_u64(231);

    let (num_train, num_dims, num_classes) = (500, 32, 10);
    let w = Matrix::gaussian(num_dims, num_classes, 1e-4, &mut rng);
    let x = Matrix::random(num_train, num_dims, &mut rng);
    let y: Vec<usize> = (0..num_train).map(|i| (i * 7) % num_classes).collect();

    // With tiny weights every class is about equally likely.
    let (loss_naive, grad_naive) = softmax_loss_naive(&w, &x, &y, 5e-6)?;
    println!("naive loss:       {loss_naive:.6}");
    println!("sanity check:     {:.6}", (num_classes as f64).ln());

    let (loss_vec, grad_vec) = softmax_loss_vectorized(&w, &x, &y, 5e-6)?;
    println!("vectorized loss:  {loss_vec:.6}");
    println!("loss difference:  {:e}", (loss_naive - loss_vec).abs());
    println!("gradient difference: {:e}", (grad_naive - grad_vec).max_abs());

    let config = GradCheckConfig::default();
    for implementation in [SoftmaxImpl::Naive, SoftmaxImpl::Vectorized] {
        let loss = SoftmaxLoss::new(5e1).with_implementation(implementation);
        let (_, analytic) = loss.evaluate(&w, &x, &y)?;

        println!("\ngradient check ({implementation:?}, reg = {}):", loss.reg);
        let samples = grad_check_sparse(
            |w| loss.loss_only(w, &x, &y),
            &w,
            &analytic,
            &config,
            &mut rng,
        )?;
        for s in samples {
            println!(
                "numerical: {:+.6e} analytic: {:+.6e}, relative error: {:.3e}",
                s.numerical, s.analytic, s.rel_error
            );
        }
    }

    Ok(())
}
