use chrono::{Days, Utc};
use common::{BookId, LoanId, MemberId};
use criterion::{Criterion, criterion_group, criterion_main};
use domain::{LOAN_PERIOD_DAYS, LateFeeCalculator, Loan};

fn bench_loan_lifecycle(c: &mut Criterion) {
    c.bench_function("domain/loan_borrow_extend_return", |b| {
        b.iter(|| {
            let mut loan = Loan::new(LoanId::generate(), BookId::generate(), MemberId::generate());
            loan.extend_loan(7).unwrap();
            loan.return_book().unwrap();
        });
    });
}

fn bench_late_fee_calculation(c: &mut Criterion) {
    let calculator = LateFeeCalculator::new();
    let borrowed = Utc::now().date_naive() - Days::new(LOAN_PERIOD_DAYS + 20);
    let loan = Loan::new_on(
        LoanId::generate(),
        BookId::generate(),
        MemberId::generate(),
        borrowed,
    );

    c.bench_function("domain/late_fee_20_days", |b| {
        b.iter(|| calculator.calculate(&loan).unwrap());
    });
}

fn bench_fee_estimation_sweep(c: &mut Criterion) {
    let calculator = LateFeeCalculator::new();

    c.bench_function("domain/fee_estimate_sweep", |b| {
        b.iter(|| {
            let mut total = 0u64;
            for days in 1..=60 {
                total += calculator.estimate(days).cents();
            }
            total
        });
    });
}

criterion_group!(
    benches,
    bench_loan_lifecycle,
    bench_late_fee_calculation,
    bench_fee_estimation_sweep,
);
criterion_main!(benches);
