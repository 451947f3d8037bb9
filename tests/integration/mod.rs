// Integration tests for the backend adapters and configuration

mod test_config;
