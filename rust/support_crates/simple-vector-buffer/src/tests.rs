use std::mem::{self, MaybeUninit};

use simple_vector_common::ErrorKind;

use crate::Buffer;

fn filled(capacity: usize) -> Buffer<u64> {
    let mut buffer = Buffer::<u64>::new(capacity);
    for (i, slot) in buffer.iter_mut().enumerate() {
        slot.write(i as u64 * 10);
    }
    buffer
}

fn read(buffer: &Buffer<u64>, index: usize) -> u64 {
    // SAFETY: callers only read slots written by `filled`.
    unsafe { buffer[index].assume_init() }
}

#[test]
fn test_zero_capacity_is_empty() {
    let buffer = Buffer::<u32>::new(0);
    assert!(!buffer.is_allocated());
    assert_eq!(buffer.capacity(), 0);
    assert!(buffer.as_slots().is_empty());
}

#[test]
fn test_allocation_has_requested_capacity() {
    let buffer = Buffer::<u32>::new(16);
    assert!(buffer.is_allocated());
    assert_eq!(buffer.capacity(), 16);
    assert_eq!(buffer.len(), 16);
    assert!(!buffer.as_ptr().is_null());
    assert!((buffer.as_ptr() as usize).is_multiple_of(mem::align_of::<u32>()));
}

#[test]
fn test_slot_write_and_read() {
    let buffer = filled(5);
    assert_eq!(read(&buffer, 0), 0);
    assert_eq!(read(&buffer, 4), 40);
    // SAFETY: index 3 is within capacity and was written above.
    let third = unsafe { buffer.get_unchecked(3).assume_init() };
    assert_eq!(third, 30);
}

#[test]
fn test_unchecked_mut_write() {
    let mut buffer = filled(3);
    // SAFETY: index 1 is within capacity.
    unsafe {
        buffer.get_unchecked_mut(1).write(7);
    }
    assert_eq!(read(&buffer, 1), 7);
}

#[test]
#[should_panic]
fn test_index_past_capacity_panics() {
    let buffer = Buffer::<u8>::new(2);
    let _ = &buffer[2];
}

#[test]
fn test_release_leaves_buffer_empty() {
    let mut buffer = filled(4);
    let original = buffer.as_ptr();
    let (ptr, capacity) = buffer.release();
    assert!(!buffer.is_allocated());
    assert_eq!(buffer.capacity(), 0);
    assert_eq!(ptr as *const u64, original);
    assert_eq!(capacity, 4);

    // SAFETY: the pair comes straight from `release`.
    let adopted = unsafe { Buffer::from_raw_parts(ptr, capacity) };
    assert_eq!(adopted.capacity(), 4);
    assert_eq!(read(&adopted, 2), 20);
}

#[test]
fn test_raw_parts_of_empty_buffer() {
    let (ptr, capacity) = Buffer::<String>::empty().into_raw_parts();
    assert_eq!(capacity, 0);
    // SAFETY: the pair comes straight from `into_raw_parts`.
    let adopted = unsafe { Buffer::from_raw_parts(ptr, capacity) };
    assert!(!adopted.is_allocated());
}

#[test]
fn test_swap_exchanges_allocations() {
    let mut a = filled(2);
    let mut b = Buffer::<u64>::new(0);
    let a_ptr = a.as_ptr();
    a.swap(&mut b);
    assert!(!a.is_allocated());
    assert_eq!(b.capacity(), 2);
    assert_eq!(b.as_ptr(), a_ptr);
    assert_eq!(read(&b, 1), 10);
}

#[test]
fn test_take_moves_ownership() {
    let mut source = filled(3);
    let ptr = source.as_ptr();
    let target = mem::take(&mut source);
    assert!(!source.is_allocated());
    assert_eq!(target.as_ptr(), ptr);
    assert_eq!(target.capacity(), 3);
}

#[test]
fn test_zero_sized_elements_do_not_allocate() {
    let mut buffer = Buffer::<()>::new(1000);
    assert!(!buffer.is_allocated());
    assert_eq!(buffer.capacity(), 1000);
    buffer[999].write(());
}

#[test]
fn test_try_new_reports_capacity_overflow() {
    let err = Buffer::<u64>::try_new(usize::MAX).unwrap_err();
    assert_eq!(
        err.kind(),
        &ErrorKind::CapacityOverflow {
            requested: usize::MAX
        }
    );
}

#[test]
fn test_try_new_succeeds_for_small_requests() {
    let buffer = Buffer::<u16>::try_new(8).expect("try_new");
    assert_eq!(buffer.capacity(), 8);
    assert!(Buffer::<u16>::try_new(0).expect("try_new").as_slots().is_empty());
}

#[test]
#[should_panic(expected = "capacity overflow")]
fn test_new_panics_on_capacity_overflow() {
    let _ = Buffer::<u64>::new(usize::MAX / 2);
}

#[test]
fn test_drop_does_not_run_element_destructors() {
    use std::rc::Rc;

    let counter = Rc::new(());
    let mut buffer = Buffer::<Rc<()>>::new(2);
    buffer[0].write(Rc::clone(&counter));
    assert_eq!(Rc::strong_count(&counter), 2);

    // SAFETY: slot 0 was initialized above and is read out exactly once.
    let value = unsafe { buffer[0].assume_init_read() };
    drop(buffer);
    assert_eq!(Rc::strong_count(&counter), 2);
    drop(value);
    assert_eq!(Rc::strong_count(&counter), 1);
}

#[test]
fn test_debug_output() {
    let buffer = Buffer::<u8>::new(3);
    let text = format!("{buffer:?}");
    assert!(text.starts_with("Buffer"));
    assert!(text.contains("capacity: 3"));
}

#[test]
fn test_slots_are_maybe_uninit() {
    let mut buffer = Buffer::<String>::new(1);
    let slot: &mut MaybeUninit<String> = &mut buffer[0];
    slot.write("value".to_string());
    // SAFETY: slot 0 was initialized above and is read out exactly once.
    let value = unsafe { buffer[0].assume_init_read() };
    assert_eq!(value, "value");
}
