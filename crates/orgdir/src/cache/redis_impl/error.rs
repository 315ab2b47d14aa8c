//! Redis error mapping to CacheError.

use orgdir_core::cache::CacheError;

/// Maps Redis errors to CacheError.
pub fn map_redis_error(err: redis::RedisError) -> CacheError {
    if err.is_connection_refusal() || err.is_timeout() || err.is_connection_dropped() {
        CacheError::ConnectionFailed(err.to_string())
    } else {
        CacheError::OperationFailed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_errors_are_operation_failures() {
        let err = redis::RedisError::from((redis::ErrorKind::TypeError, "WRONGTYPE"));
        assert!(matches!(
            map_redis_error(err),
            CacheError::OperationFailed(_)
        ));
    }

    #[test]
    fn test_io_errors_are_connection_failures() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = redis::RedisError::from(io);
        assert!(matches!(
            map_redis_error(err),
            CacheError::ConnectionFailed(_)
        ));
    }
}
