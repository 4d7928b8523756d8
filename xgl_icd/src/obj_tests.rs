//! Unit tests for obj.rs

use crate::alloc::{SystemAllocType, SystemAllocator, TrackingAllocator};
use crate::error::Error;
use crate::obj::{BaseObject, DbgObjectType};
use std::sync::Arc;

fn tracking() -> (Arc<TrackingAllocator>, Arc<dyn SystemAllocator>) {
    let tracker = Arc::new(TrackingAllocator::new());
    let allocator: Arc<dyn SystemAllocator> = tracker.clone();
    (tracker, allocator)
}

#[test]
fn test_base_object_without_debug() {
    let (tracker, allocator) = tracking();

    let base = BaseObject::create(&allocator, false, DbgObjectType::Shader, 128, Some(&[1, 2, 3])).unwrap();
    assert_eq!(base.object_type(), DbgObjectType::Shader);
    assert_eq!(base.size(), 128);
    assert!(base.debug_record().is_none());
    assert_eq!(tracker.live_count_of(SystemAllocType::ApiObject), 1);
    assert_eq!(tracker.live_count_of(SystemAllocType::Debug), 0);

    drop(base);
    assert_eq!(tracker.live_count(), 0);
}

#[test]
fn test_base_object_copies_create_info_when_debugging() {
    let (tracker, allocator) = tracking();

    let base = BaseObject::create(&allocator, true, DbgObjectType::Shader, 64, Some(&[9, 8, 7, 6])).unwrap();
    let record = base.debug_record().unwrap();
    assert_eq!(record.create_info(), &[9, 8, 7, 6]);
    assert_eq!(tracker.live_bytes_of(SystemAllocType::Debug), 4);

    drop(base);
    assert_eq!(tracker.live_count(), 0);
}

#[test]
fn test_base_object_debug_without_create_info() {
    let (_tracker, allocator) = tracking();

    let base = BaseObject::create(&allocator, true, DbgObjectType::Device, 64, None).unwrap();
    assert!(base.debug_record().is_none());
}

#[test]
fn test_base_object_out_of_memory() {
    let (tracker, allocator) = tracking();
    tracker.fail_nth(0);

    let result = BaseObject::create(&allocator, false, DbgObjectType::Shader, 64, None);
    assert_eq!(result.unwrap_err(), Error::OutOfMemory);
    assert_eq!(tracker.live_count(), 0);
}

#[test]
fn test_base_object_debug_record_out_of_memory_releases_base() {
    let (tracker, allocator) = tracking();
    tracker.fail_nth(1);

    let result = BaseObject::create(&allocator, true, DbgObjectType::Shader, 64, Some(&[1]));
    assert_eq!(result.unwrap_err(), Error::OutOfMemory);
    assert_eq!(tracker.live_count(), 0);
}
