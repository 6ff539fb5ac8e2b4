// Behavioral tests for the timer service
//
// 定时器服务行为测试

mod service {
    mod cancel_tests;
    mod oneshot_tests;
    mod periodic_tests;
    mod reuse_tests;
    mod shutdown_tests;
}
