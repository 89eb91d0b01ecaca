//! Load/save of the parameter image

use injector_hal::storage::{NvStorage, StorageError};

use super::image::{PersistedImage, IMAGE_LEN};
use crate::params::ParameterStore;

/// Result of reading the settings region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LoadOutcome {
    /// Every field was in range
    Restored(ParameterStore),
    /// The image decoded but some fields had to be clamped
    Repaired(ParameterStore),
    /// The region is erased (never written)
    Blank,
}

impl LoadOutcome {
    /// The loaded store, or factory defaults for a blank region
    pub fn into_store(self) -> ParameterStore {
        match self {
            LoadOutcome::Restored(store) | LoadOutcome::Repaired(store) => store,
            LoadOutcome::Blank => ParameterStore::factory(),
        }
    }
}

/// Parameter persistence over a non-volatile region
pub struct Persistence<S> {
    storage: S,
    offset: u32,
}

impl<S: NvStorage> Persistence<S> {
    /// Persist at offset 0 of `storage`
    pub fn new(storage: S) -> Self {
        Self { storage, offset: 0 }
    }

    /// Write the whole store
    pub fn save(&mut self, store: &ParameterStore) -> Result<(), StorageError> {
        let bytes = PersistedImage::from_store(store).to_bytes();
        self.storage.write(self.offset, &bytes)?;
        debug!("saved {} byte settings image", IMAGE_LEN);
        Ok(())
    }

    /// Read the store back
    pub fn load(&mut self) -> Result<LoadOutcome, StorageError> {
        let mut bytes = [0u8; IMAGE_LEN];
        self.storage.read(self.offset, &mut bytes)?;

        if PersistedImage::is_blank(&bytes) {
            return Ok(LoadOutcome::Blank);
        }

        let mut store = PersistedImage::from_bytes(&bytes).into_store_unchecked();
        if store.sanitize() {
            Ok(LoadOutcome::Repaired(store))
        } else {
            Ok(LoadOutcome::Restored(store))
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::FieldId;
    use injector_hal::storage::RamStorage;
    use proptest::prelude::*;

    #[test]
    fn test_blank_region() {
        let mut p = Persistence::new(RamStorage::<64>::new());
        let outcome = p.load().unwrap();
        assert_eq!(outcome, LoadOutcome::Blank);
        assert_eq!(outcome.into_store(), ParameterStore::factory());
    }

    #[test]
    fn test_save_writes_at_offset_zero() {
        let mut p = Persistence::new(RamStorage::<64>::new());
        p.save(&ParameterStore::factory()).unwrap();

        let bytes = p.storage().bytes();
        assert_eq!(&bytes[0..4], &60i32.to_le_bytes());
        // Nothing past the image is touched
        assert!(bytes[IMAGE_LEN..].iter().all(|&b| b == 0xFF));
        assert_eq!(p.storage().write_count(), 1);
    }

    #[test]
    fn test_out_of_range_image_is_repaired() {
        let mut storage = RamStorage::<64>::new();
        let mut image = PersistedImage::from_store(&ParameterStore::factory());
        image.rpm_rpm = 0;
        image.rpm_duty = -5;
        storage.bytes_mut()[..IMAGE_LEN].copy_from_slice(&image.to_bytes());

        let mut p = Persistence::new(storage);
        let LoadOutcome::Repaired(store) = p.load().unwrap() else {
            panic!("expected repaired image");
        };
        assert_eq!(store.rpm().rpm(), 600);
        assert_eq!(store.rpm().duty(), 1);
        assert_eq!(store.leak_test().seconds(), 60);
    }

    #[test]
    fn test_zeroed_region_is_not_blank() {
        let mut storage = RamStorage::<32>::new();
        storage.bytes_mut().fill(0);
        let mut p = Persistence::new(storage);

        let outcome = p.load().unwrap();
        assert!(matches!(outcome, LoadOutcome::Repaired(_)));
        assert!(outcome.into_store().is_valid());
    }

    #[test]
    fn test_region_too_small() {
        let mut p = Persistence::new(RamStorage::<16>::new());
        assert_eq!(p.load(), Err(StorageError::OutOfBounds));
        assert_eq!(
            p.save(&ParameterStore::factory()),
            Err(StorageError::OutOfBounds)
        );
    }

    fn any_store() -> impl Strategy<Value = ParameterStore> {
        let r = |id: FieldId| {
            let range = id.range();
            range.min..=range.max
        };
        (
            r(FieldId::LeakSeconds),
            r(FieldId::RpmSeconds),
            r(FieldId::RpmSpeed),
            r(FieldId::RpmDuty),
            r(FieldId::FullFlowSeconds),
            r(FieldId::PwmPulses),
            r(FieldId::PwmPulseWidth),
        )
            .prop_map(|values| {
                let (a, b, c, d, e, f, g) = values;
                let mut store = ParameterStore::factory();
                for (id, v) in FieldId::ALL.into_iter().zip([a, b, c, d, e, f, g]) {
                    store.set(id, v);
                }
                store
            })
    }

    proptest! {
        #[test]
        fn prop_save_load_roundtrip(store in any_store()) {
            let mut p = Persistence::new(RamStorage::<IMAGE_LEN>::new());
            p.save(&store).unwrap();
            prop_assert_eq!(p.load().unwrap(), LoadOutcome::Restored(store));
        }
    }
}
