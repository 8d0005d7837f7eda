use crate::NUM_DICE;

/// Five die faces, for property tests.
#[derive(Clone, Copy, Debug)]
pub struct Hand(pub [u8; NUM_DICE]);

impl quickcheck::Arbitrary for Hand {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        let mut faces = [0u8; NUM_DICE];
        for face in faces.iter_mut() {
            *face = *g.choose(&[1, 2, 3, 4, 5, 6]).unwrap();
        }
        Hand(faces)
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        // Shrink towards all ones, one die at a time.
        let hand = *self;
        Box::new((0..NUM_DICE).filter_map(move |i| {
            (hand.0[i] > 1).then(|| {
                let mut smaller = hand;
                smaller.0[i] -= 1;
                smaller
            })
        }))
    }
}
