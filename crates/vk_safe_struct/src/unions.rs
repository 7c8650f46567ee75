//! Sum types for Vulkan unions
//!
//! A raw union carries no tag. When the caller knows which member is active
//! (a counter's storage class, whether an address lives on the device or the
//! host) the union can be turned into one of these owned enums. Unions left
//! inside copied structures stay opaque bytes; a host pointer copied that way
//! is not owned by the copy.

use std::ffi::c_void;
use std::ptr;

use ash::vk;

/// Value of one performance counter
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CounterValue {
    /// `int32`
    Int32(i32),
    /// `int64`
    Int64(i64),
    /// `uint32`
    Uint32(u32),
    /// `uint64`
    Uint64(u64),
    /// `float32`
    Float32(f32),
    /// `float64`
    Float64(f64),
}

impl CounterValue {
    /// Read the member of `raw` selected by `storage`
    ///
    /// Returns `None` for a storage class this crate does not know.
    ///
    /// # Safety
    /// The member named by `storage` must be initialised.
    pub unsafe fn from_raw(raw: &vk::PerformanceCounterResultKHR, storage: vk::PerformanceCounterStorageKHR) -> Option<Self> {
        // SAFETY: the caller guarantees the selected member is initialised.
        let value = unsafe {
            match storage {
                vk::PerformanceCounterStorageKHR::INT32 => Self::Int32(raw.int32),
                vk::PerformanceCounterStorageKHR::INT64 => Self::Int64(raw.int64),
                vk::PerformanceCounterStorageKHR::UINT32 => Self::Uint32(raw.uint32),
                vk::PerformanceCounterStorageKHR::UINT64 => Self::Uint64(raw.uint64),
                vk::PerformanceCounterStorageKHR::FLOAT32 => Self::Float32(raw.float32),
                vk::PerformanceCounterStorageKHR::FLOAT64 => Self::Float64(raw.float64),
                _ => return None,
            }
        };
        Some(value)
    }

    /// Raw union with the matching member set
    pub fn to_raw(self) -> vk::PerformanceCounterResultKHR {
        match self {
            Self::Int32(int32) => vk::PerformanceCounterResultKHR { int32 },
            Self::Int64(int64) => vk::PerformanceCounterResultKHR { int64 },
            Self::Uint32(uint32) => vk::PerformanceCounterResultKHR { uint32 },
            Self::Uint64(uint64) => vk::PerformanceCounterResultKHR { uint64 },
            Self::Float32(float32) => vk::PerformanceCounterResultKHR { float32 },
            Self::Float64(float64) => vk::PerformanceCounterResultKHR { float64 },
        }
    }

    /// Storage class of the active member
    pub const fn storage(self) -> vk::PerformanceCounterStorageKHR {
        match self {
            Self::Int32(_) => vk::PerformanceCounterStorageKHR::INT32,
            Self::Int64(_) => vk::PerformanceCounterStorageKHR::INT64,
            Self::Uint32(_) => vk::PerformanceCounterStorageKHR::UINT32,
            Self::Uint64(_) => vk::PerformanceCounterStorageKHR::UINT64,
            Self::Float32(_) => vk::PerformanceCounterStorageKHR::FLOAT32,
            Self::Float64(_) => vk::PerformanceCounterStorageKHR::FLOAT64,
        }
    }

    /// Value widened to `f64`
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Int32(value) => f64::from(value),
            Self::Int64(value) => value as f64,
            Self::Uint32(value) => f64::from(value),
            Self::Uint64(value) => value as f64,
            Self::Float32(value) => f64::from(value),
            Self::Float64(value) => value,
        }
    }
}

/// Where a `VkDeviceOrHostAddressConstKHR` points
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressSpace {
    /// A buffer device address
    Device,
    /// Host memory of `len` bytes
    Host {
        /// Number of bytes to copy
        len: usize,
    },
}

/// Owned form of `VkDeviceOrHostAddressConstKHR`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceOrHostAddress {
    /// Device address, copied by value
    Device(vk::DeviceAddress),
    /// Copy of the host bytes
    Host(Vec<u8>),
}

impl DeviceOrHostAddress {
    /// Copy the member of `raw` selected by `space`
    ///
    /// # Safety
    /// For [`AddressSpace::Host`], `host_address` must be null or valid for
    /// reads of `len` bytes. For [`AddressSpace::Device`], `device_address`
    /// must be initialised.
    pub unsafe fn from_raw(raw: &vk::DeviceOrHostAddressConstKHR, space: AddressSpace) -> Self {
        match space {
            // SAFETY: the caller guarantees the member is initialised.
            AddressSpace::Device => Self::Device(unsafe { raw.device_address }),
            AddressSpace::Host { len } => {
                // SAFETY: see above.
                let host = unsafe { raw.host_address };
                if host.is_null() || len == 0 {
                    return Self::Host(Vec::new());
                }
                // SAFETY: readable for `len` bytes per the caller contract.
                Self::Host(unsafe { std::slice::from_raw_parts(host.cast::<u8>(), len) }.to_vec())
            }
        }
    }

    /// Raw union referring to this value; host bytes stay owned by `self`
    pub fn to_raw(&self) -> vk::DeviceOrHostAddressConstKHR {
        match self {
            Self::Device(device_address) => vk::DeviceOrHostAddressConstKHR {
                device_address: *device_address,
            },
            Self::Host(bytes) => vk::DeviceOrHostAddressConstKHR {
                host_address: if bytes.is_empty() {
                    ptr::null()
                } else {
                    bytes.as_ptr().cast::<c_void>()
                },
            },
        }
    }

    /// Address space of the value
    pub fn space(&self) -> AddressSpace {
        match self {
            Self::Device(_) => AddressSpace::Device,
            Self::Host(bytes) => AddressSpace::Host { len: bytes.len() },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_counter_value_by_storage() {
        let raw = vk::PerformanceCounterResultKHR { float64: 0.75 };
        let value = unsafe { CounterValue::from_raw(&raw, vk::PerformanceCounterStorageKHR::FLOAT64) }.unwrap();
        assert_eq!(value.storage(), vk::PerformanceCounterStorageKHR::FLOAT64);
        assert_relative_eq!(value.as_f64(), 0.75);

        let raw = CounterValue::Uint32(42).to_raw();
        let value = unsafe { CounterValue::from_raw(&raw, vk::PerformanceCounterStorageKHR::UINT32) }.unwrap();
        assert_eq!(value, CounterValue::Uint32(42));
    }

    #[test]
    fn test_counter_float32_widening() {
        let value = CounterValue::Float32(1.1);
        assert_relative_eq!(value.as_f64(), 1.1, epsilon = 1e-6);
    }

    #[test]
    fn test_unknown_storage() {
        let raw = vk::PerformanceCounterResultKHR { uint64: 1 };
        let storage = vk::PerformanceCounterStorageKHR::from_raw(0x7fff);
        assert!(unsafe { CounterValue::from_raw(&raw, storage) }.is_none());
    }

    #[test]
    fn test_host_address_is_owned() {
        let mut vertices = [1u8, 2, 3, 4];
        let raw = vk::DeviceOrHostAddressConstKHR {
            host_address: vertices.as_ptr().cast(),
        };
        let address = unsafe { DeviceOrHostAddress::from_raw(&raw, AddressSpace::Host { len: 4 }) };
        vertices[0] = 9;

        assert_eq!(address, DeviceOrHostAddress::Host(vec![1, 2, 3, 4]));
        assert_eq!(address.space(), AddressSpace::Host { len: 4 });
        let back = address.to_raw();
        assert_ne!(unsafe { back.host_address }, vertices.as_ptr().cast());
    }

    #[test]
    fn test_device_address_by_value() {
        let raw = vk::DeviceOrHostAddressConstKHR {
            device_address: 0x1000,
        };
        let address = unsafe { DeviceOrHostAddress::from_raw(&raw, AddressSpace::Device) };
        assert_eq!(address, DeviceOrHostAddress::Device(0x1000));
        assert_eq!(unsafe { address.to_raw().device_address }, 0x1000);
    }

    #[test]
    fn test_empty_host_address_is_null() {
        let address = DeviceOrHostAddress::Host(Vec::new());
        assert!(unsafe { address.to_raw().host_address }.is_null());
    }
}
