#![no_main]

use arbitrary::Unstructured;

use geostep::status::StatusLine;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut u = Unstructured::new(data);
    let Ok(len) = u.arbitrary_len::<i32>() else {
        return;
    };
    let mut vec: Vec<i32> = std::iter::repeat_with(|| u.arbitrary().unwrap_or_default())
        .take(len)
        .collect();
    vec.sort();

    let status = vec.iter().copied().collect::<StatusLine<i32, 4>>();

    let search: i32 = u.arbitrary().unwrap_or_default();

    assert_eq!(
        vec.partition_point(|x| x <= &search),
        status.partition_point(|x| x <= &search)
    );
    assert_eq!(
        vec.iter().position(|x| x == &search),
        status.position(&search)
    );
});
