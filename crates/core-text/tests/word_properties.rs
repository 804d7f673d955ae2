use core_text::motion::{scan_backward, scan_forward, word_backward, word_forward, word_range_at};
use core_text::{Buffer, Position, classify};
use proptest::prelude::*;

fn line_strategy() -> impl Strategy<Value = String> {
    proptest::collection::vec(
        prop_oneof![
            Just('a'),
            Just('Z'),
            Just('_'),
            Just('9'),
            Just(' '),
            Just('\t'),
            Just('.'),
            Just('-'),
            Just('é'),
            Just('漢'),
        ],
        0..24,
    )
    .prop_map(|cs| cs.into_iter().collect())
}

proptest! {
    #[test]
    fn forward_scan_advances_and_stays_in_line(line in line_strategy(), from in 0usize..30) {
        let chars: Vec<char> = line.chars().collect();
        let start = from.min(chars.len());
        let to = scan_forward(&chars, start);
        prop_assert!(to <= chars.len());
        if start < chars.len() {
            prop_assert!(to > start);
        } else {
            prop_assert_eq!(to, start);
        }
    }

    #[test]
    fn backward_scan_retreats_and_stays_in_line(line in line_strategy(), from in 0usize..30) {
        let chars: Vec<char> = line.chars().collect();
        let start = from.min(chars.len());
        let to = scan_backward(&chars, start);
        prop_assert!(to <= start);
        if start > 0 {
            prop_assert!(to < start);
        }
    }

    #[test]
    fn word_range_is_one_class_run(line in line_strategy(), col in 0usize..30) {
        let chars: Vec<char> = line.chars().collect();
        let (s, e) = word_range_at(&line, col);
        if chars.is_empty() {
            prop_assert_eq!((s, e), (0, 0));
        } else {
            prop_assert!(s < e && e <= chars.len());
            let class = classify(chars[s]);
            prop_assert!(chars[s..e].iter().all(|&c| classify(c) == class));
            prop_assert!(s == 0 || classify(chars[s - 1]) != class);
            prop_assert!(e == chars.len() || classify(chars[e]) != class);
        }
    }

    #[test]
    fn word_jumps_stay_inside_buffer(a in line_strategy(), b in line_strategy(), line in 0usize..2, col in 0usize..30) {
        let buf = Buffer::new(vec![a, b]);
        let pos = buf.clamp(Position::new(line, col));
        let fwd = word_forward(&buf, pos);
        let back = word_backward(&buf, pos);
        prop_assert_eq!(buf.clamp(fwd), fwd);
        prop_assert_eq!(buf.clamp(back), back);
        prop_assert!(fwd >= pos);
        prop_assert!(back <= pos);
    }
}
