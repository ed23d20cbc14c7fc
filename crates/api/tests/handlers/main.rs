
mod appointment_test;
mod availability_test;
mod employee_test;
