#![no_main]

use arbitrary::{Arbitrary, Unstructured};

use geostep::status::StatusLine;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
enum Op {
    Insert { idx: usize, val: i32 },
    Remove { idx: usize },
}

impl Op {
    fn apply_to_vec(&self, vec: &mut Vec<i32>) {
        match self {
            Op::Insert { idx, val } => {
                vec.insert(*idx % (vec.len() + 1), *val);
            }
            Op::Remove { idx } => {
                if !vec.is_empty() {
                    vec.remove(*idx % vec.len());
                }
            }
        }
    }

    fn apply_to_status<const B: usize>(&self, status: &mut StatusLine<i32, B>) {
        match self {
            Op::Insert { idx, val } => {
                status.insert(*idx % (status.len() + 1), *val);
            }
            Op::Remove { idx } => {
                if !status.is_empty() {
                    status.remove(*idx % status.len());
                }
            }
        }
    }
}

fn arbitrary_ops(mut u: Unstructured) -> Result<(), arbitrary::Error> {
    let len = u.arbitrary_len::<Op>()?;
    let mut vec = Vec::new();
    let mut status = StatusLine::<_, 4>::new();
    for _ in 0..len {
        let op: Op = u.arbitrary()?;
        op.apply_to_vec(&mut vec);
        op.apply_to_status(&mut status);
        status.check_invariants();

        assert_eq!(status.len(), vec.len());
        assert_eq!(status.iter().copied().collect::<Vec<_>>(), vec);
        assert_eq!(status.first(), vec.first());
        assert_eq!(status.last(), vec.last());
    }
    Ok(())
}

fuzz_target!(|data: &[u8]| {
    let u = Unstructured::new(data);
    let _ = arbitrary_ops(u);
});
