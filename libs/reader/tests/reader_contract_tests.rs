use proptest::prelude::*;
use samplebridge_core::ServiceIdentity;
use samplebridge_reader::{
    MemoryDataSpace, MemoryReader, ReaderError, ReaderErrorKind, Result, SampleReader,
};

fn identity() -> ServiceIdentity {
    ServiceIdentity::parse("Radar", "FrontLeft", "Objects").unwrap()
}

fn connected_reader(samples: &[Vec<u8>]) -> (MemoryDataSpace, MemoryReader) {
    let space = MemoryDataSpace::new();
    for sample in samples {
        space.publish(&identity(), sample.clone());
    }
    let mut reader = space.reader(identity());
    reader.connect();
    (space, reader)
}

#[test]
fn take_up_to_honours_max_samples() {
    let (space, mut reader) = connected_reader(&[vec![1; 20], vec![2; 20], vec![3; 20]]);
    let mut buf = [0u8; 100];

    let taken = reader.take_up_to(&mut buf, 20, 2).unwrap();

    assert_eq!(taken, 2);
    assert_eq!(&buf[..20], &[1; 20]);
    assert_eq!(&buf[20..40], &[2; 20]);
    assert!(buf[40..].iter().all(|b| *b == 0));
    assert_eq!(space.pending(&identity()), 1);
    assert_eq!(reader.peek_next(), Ok(Some(20)));
}

#[test]
fn take_fills_buffer_capacity() {
    let samples: Vec<_> = (0..5u8).map(|i| vec![i; 8]).collect();
    let (space, mut reader) = connected_reader(&samples);
    let mut buf = [0u8; 30];

    // floor(30 / 8) = 3 slots
    assert_eq!(reader.take(&mut buf, 8), Ok(3));
    assert_eq!(&buf[16..24], &[2; 8]);
    assert_eq!(space.pending(&identity()), 2);
}

#[test]
fn peek_does_not_consume() {
    let (space, mut reader) = connected_reader(&[vec![7; 12]]);

    assert_eq!(reader.peek_next(), Ok(Some(12)));
    assert_eq!(reader.peek_next(), Ok(Some(12)));
    assert_eq!(space.pending(&identity()), 1);
}

#[test]
fn peek_then_take_next_succeeds() {
    let (_space, mut reader) = connected_reader(&[vec![5; 33]]);

    let size = reader.peek_next().unwrap().unwrap();
    let mut buf = vec![0u8; size];

    assert_eq!(reader.take_next(&mut buf), Ok(true));
    assert_eq!(buf, vec![5; 33]);
    assert_eq!(reader.peek_next(), Ok(None));
}

#[test]
fn take_next_on_empty_space_reports_nothing() {
    let (_space, mut reader) = connected_reader(&[]);
    let mut buf = [0u8; 4];

    assert_eq!(reader.take_next(&mut buf), Ok(false));
    assert_eq!(reader.peek_next(), Ok(None));
}

#[test]
fn take_next_rejects_empty_buffer() {
    let (_space, mut reader) = connected_reader(&[vec![1; 4]]);

    assert_eq!(reader.take_next(&mut []), Err(ReaderError::InvalidRecvBuffer));
}

#[test]
fn mismatched_sample_stays_pending() {
    let (space, mut reader) = connected_reader(&[vec![9; 16]]);
    let mut buf = [0u8; 8];

    let err = reader.take_next(&mut buf).unwrap_err();
    assert_eq!(
        err,
        ReaderError::SampleSizeMismatch {
            expected: 8,
            actual: 16,
            taken: 0
        }
    );
    assert_eq!(buf, [0u8; 8]);
    assert_eq!(space.pending(&identity()), 1);
}

#[test]
fn batch_stops_at_mismatch_and_keeps_earlier_samples() {
    let (space, mut reader) = connected_reader(&[vec![1; 4], vec![2; 4], vec![3; 6], vec![4; 4]]);
    let mut buf = [0u8; 16];

    let err = reader.take(&mut buf, 4).unwrap_err();

    assert_eq!(
        err,
        ReaderError::SampleSizeMismatch {
            expected: 4,
            actual: 6,
            taken: 2
        }
    );
    assert_eq!(&buf[..8], &[1, 1, 1, 1, 2, 2, 2, 2]);
    assert_eq!(&buf[8..], &[0; 8]);
    assert_eq!(space.pending(&identity()), 2);
    assert_eq!(reader.peek_next(), Ok(Some(6)));
}

#[test]
fn batch_validates_arguments() {
    let (_space, mut reader) = connected_reader(&[vec![1; 8]]);

    assert_eq!(reader.take(&mut [], 8), Err(ReaderError::InvalidRecvBuffer));
    assert_eq!(
        reader.take(&mut [0u8; 16], 0),
        Err(ReaderError::InvalidRecvBuffer)
    );
    assert_eq!(
        reader.take_up_to(&mut [0u8; 4], 8, 1),
        Err(ReaderError::RecvBufferTooSmall {
            buffer_size: 4,
            sample_size: 8
        })
    );
}

#[test]
fn zero_max_samples_takes_nothing() {
    let (space, mut reader) = connected_reader(&[vec![1; 8]]);

    assert_eq!(reader.take_up_to(&mut [0u8; 8], 8, 0), Ok(0));
    assert_eq!(space.pending(&identity()), 1);
}

#[test]
fn operations_before_connect_fail_without_writing() {
    let space = MemoryDataSpace::new();
    space.publish(&identity(), vec![1; 8]);
    let mut reader = space.reader(identity());
    let mut buf = [0u8; 8];

    assert!(!reader.is_connected());
    assert_eq!(reader.peek_next(), Err(ReaderError::NotConnected));
    assert_eq!(reader.take_next(&mut buf), Err(ReaderError::NotConnected));
    assert_eq!(reader.take(&mut buf, 8), Err(ReaderError::NotConnected));
    assert_eq!(
        reader.take_up_to(&mut buf, 8, 1).unwrap_err().kind(),
        ReaderErrorKind::NotConnected
    );
    // Not-connected wins over buffer validation
    assert_eq!(reader.take(&mut [], 0), Err(ReaderError::NotConnected));

    assert_eq!(buf, [0u8; 8]);
    assert_eq!(space.pending(&identity()), 1);
}

#[test]
fn identity_accessors_through_trait_object() -> Result<()> {
    let identity = ServiceIdentity::parse("Camera", "Rear", "Frames")?;
    let reader: Box<dyn SampleReader> = Box::new(MemoryDataSpace::new().reader(identity));

    assert_eq!(reader.service_id().as_str(), "Camera");
    assert_eq!(reader.instance_id().as_str(), "Rear");
    assert_eq!(reader.event_id().as_str(), "Frames");
    Ok(())
}

proptest! {
    #[test]
    fn batch_count_never_exceeds_cap(
        available in 0usize..40,
        sample_size in 1usize..32,
        buffer_size in 0usize..512,
        max_samples in 0usize..50,
    ) {
        let samples = vec![vec![0xAA; sample_size]; available];
        let (_space, mut reader) = connected_reader(&samples);
        let mut buf = vec![0u8; buffer_size];

        match reader.take_up_to(&mut buf, sample_size, max_samples) {
            Ok(count) => {
                let cap = (buffer_size / sample_size).min(max_samples);
                prop_assert!(count <= cap);
                prop_assert_eq!(count, cap.min(available));
            }
            Err(ReaderError::InvalidRecvBuffer) => {
                prop_assert_eq!(buffer_size, 0);
            }
            Err(ReaderError::RecvBufferTooSmall { .. }) => {
                prop_assert!(buffer_size > 0 && buffer_size < sample_size);
            }
            Err(other) => {
                prop_assert!(false, "unexpected error {:?}", other);
            }
        }
    }

    #[test]
    fn take_next_requires_exact_size(actual in 1usize..64, requested in 1usize..64) {
        let (space, mut reader) = connected_reader(&[vec![1; actual]]);
        let mut buf = vec![0u8; requested];

        let result = reader.take_next(&mut buf);
        if actual == requested {
            prop_assert_eq!(result, Ok(true));
            prop_assert_eq!(space.pending(&identity()), 0);
        } else {
            prop_assert_eq!(
                result,
                Err(ReaderError::SampleSizeMismatch { expected: requested, actual, taken: 0 })
            );
            prop_assert_eq!(space.pending(&identity()), 1);
        }
    }

    #[test]
    fn draining_empty_space_is_not_an_error(sample_size in 1usize..64, slots in 1usize..8) {
        let (_space, mut reader) = connected_reader(&[]);
        let mut buf = vec![0u8; sample_size * slots];

        prop_assert_eq!(reader.take(&mut buf, sample_size), Ok(0));
        prop_assert_eq!(reader.take_up_to(&mut buf, sample_size, slots), Ok(0));
    }
}
