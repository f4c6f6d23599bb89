use super::*;

#[test]
fn test_shallow_recursion() {
    fn factorial(n: u64) -> u64 {
        ensure_sufficient_stack(|| if n <= 1 { 1 } else { n * factorial(n - 1) })
    }

    assert_eq!(factorial(10), 3_628_800);
}

#[test]
fn test_deep_recursion() {
    fn deep_recurse(n: u64) -> u64 {
        ensure_sufficient_stack(|| if n == 0 { 0 } else { deep_recurse(n - 1) + 1 })
    }

    assert_eq!(deep_recurse(100_000), 100_000);
}

#[test]
fn test_budget_counts_depth() {
    let mut budget = DepthBudget::new(3);
    assert_eq!(budget.enter(), Ok(()));
    assert_eq!(budget.enter(), Ok(()));
    assert_eq!(budget.depth(), 2);
    budget.exit();
    assert_eq!(budget.depth(), 1);
}

#[test]
fn test_budget_rejects_past_limit() {
    let mut budget = DepthBudget::new(2);
    assert_eq!(budget.enter(), Ok(()));
    assert_eq!(budget.enter(), Ok(()));
    assert_eq!(budget.enter(), Err(DepthExceeded { limit: 2 }));
    // A failed enter does not consume a level.
    assert_eq!(budget.depth(), 2);
}

#[test]
fn test_budget_with_recursion() {
    fn recurse(budget: &mut DepthBudget, n: u32) -> Result<u32, DepthExceeded> {
        budget.enter()?;
        let result = ensure_sufficient_stack(|| if n == 0 { Ok(0) } else { recurse(budget, n - 1).map(|r| r + 1) });
        budget.exit();
        result
    }

    let mut budget = DepthBudget::new(50);
    assert_eq!(recurse(&mut budget, 10), Ok(10));
    assert_eq!(budget.depth(), 0);
    assert!(recurse(&mut budget, 1000).is_err());
    assert_eq!(budget.depth(), 0);
}

#[test]
fn test_depth_exceeded_display() {
    assert_eq!(DepthExceeded { limit: 7 }.to_string(), "recursion depth limit of 7 exceeded");
}
