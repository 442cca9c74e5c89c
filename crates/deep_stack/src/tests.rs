use super::*;

enum Chain {
    End,
    Link(u32, Box<Chain>),
}

fn build(len: u32) -> Chain {
    let mut chain = Chain::End;
    for i in 0..len {
        chain = Chain::Link(i, Box::new(chain));
    }
    chain
}

fn sum(chain: &Chain) -> u64 {
    ensure_sufficient_stack(|| match chain {
        Chain::End => 0,
        Chain::Link(v, rest) => u64::from(*v) + sum(rest),
    })
}

fn clone_chain(chain: &Chain) -> Chain {
    ensure_sufficient_stack(|| match chain {
        Chain::End => Chain::End,
        Chain::Link(v, rest) => Chain::Link(*v, Box::new(clone_chain(rest))),
    })
}

fn drop_iteratively(mut chain: Chain) {
    while let Chain::Link(_, rest) = chain {
        chain = *rest;
    }
}

#[test]
fn shallow_walk() {
    let chain = build(10);
    assert_eq!(sum(&chain), 45);
    drop_iteratively(chain);
}

#[test]
fn deep_rebuild_does_not_overflow() {
    let chain = build(200_000);
    let copy = clone_chain(&chain);
    assert_eq!(sum(&copy), sum(&chain));
    drop_iteratively(chain);
    drop_iteratively(copy);
}

#[test]
fn passes_results_through() {
    let result: Result<u8, &str> = ensure_sufficient_stack(|| Err("rejected"));
    assert_eq!(result, Err("rejected"));
}
