use super::schema::{Endpoint, EntitySchema, FieldSpec, FilterSpec};
use std::time::Duration;

pub static FEES: EntitySchema = EntitySchema {
    screen: "fees",
    label: "Fee",
    endpoint: Endpoint::Fee,
    lookups: None,
    id_wire: "FeeId",
    fields: &[FieldSpec::text("feeName", "FeeName").required()],
    filters: &[FilterSpec::column("feeName", &["FeeName"])],
    required_message: "Fee Name is required!",
    fetch_error: "Error fetching fees.",
    toast_ttl: Duration::from_millis(3000),
    close_delay: Duration::from_millis(1000),
};

pub static FEE_STRUCTURES: EntitySchema = EntitySchema {
    screen: "feeStructures",
    label: "Fee Structure",
    endpoint: Endpoint::FeeStructure,
    lookups: Some(Endpoint::GenericLookup),
    id_wire: "FeeStructureId",
    fields: &[
        FieldSpec::integer("feeId", "FeeId").required().lookup("Fees"),
        FieldSpec::integer("academicYearId", "AcademicYearId")
            .required()
            .lookup("AcademicYear"),
        FieldSpec::integer("classId", "ClassId").required().lookup("Class"),
        FieldSpec::text("description", "Description"),
        FieldSpec::decimal("amount", "Amount").required(),
        FieldSpec::text("frequency", "Frequency"),
    ],
    filters: &[FilterSpec::any_of(
        "search",
        &["FeeName", "ClassName", "YearName"],
    )],
    required_message: "Please fill all required fields!",
    fetch_error: "Error fetching fee structures.",
    toast_ttl: Duration::from_millis(3000),
    close_delay: Duration::from_millis(1000),
};

pub static STUDENTS: EntitySchema = EntitySchema {
    screen: "students",
    label: "Student",
    endpoint: Endpoint::Student,
    lookups: Some(Endpoint::StudentLookup),
    id_wire: "StudentId",
    fields: &[
        FieldSpec::text("admissionNo", "AdmissionNo").required(),
        FieldSpec::text("firstName", "FirstName").required(),
        FieldSpec::text("lastName", "LastName"),
        FieldSpec::date("dateOfBirth", "DateOfBirth"),
        FieldSpec::integer("genderId", "GenderId").lookup("Gender"),
        FieldSpec::date("admissionDate", "AdmissionDate"),
        FieldSpec::flag("isActive", "IsActive").on_by_default(),
        FieldSpec::text("adharNumber", "AdharNumber"),
        FieldSpec::text("phnNumber", "PhnNumber").required(),
        FieldSpec::text("email", "Email").required(),
        FieldSpec::integer("admissionType", "AdmissionType").lookup("admissionType"),
        FieldSpec::integer("religion", "Religion").lookup("religion"),
        FieldSpec::integer("country", "Country").lookup("country"),
        FieldSpec::integer("state", "State").lookup("state"),
        FieldSpec::text("adress", "Adress"),
        FieldSpec::text("pincode", "Pincode"),
        FieldSpec::text("fatherName", "FatherName"),
        FieldSpec::text("parentMobileNo", "ParentMobileNo"),
        FieldSpec::text("parentEmail", "ParentEmail"),
        FieldSpec::integer("caste", "Caste").lookup("caste"),
        FieldSpec::integer("subCaste", "SubCaste").lookup("subCaste"),
        FieldSpec::integer("acyear", "Acyear"),
    ],
    filters: &[
        FilterSpec::column("name", &["FirstName", "LastName"]),
        FilterSpec::column("admissionNo", &["AdmissionNo"]),
        FilterSpec::column("phnNumber", &["PhnNumber"]),
        FilterSpec::column("email", &["Email"]),
    ],
    required_message: "Fill all required fields!",
    fetch_error: "Error fetching students.",
    toast_ttl: Duration::from_millis(2500),
    close_delay: Duration::from_millis(1000),
};

pub static TEACHERS: EntitySchema = EntitySchema {
    screen: "teachers",
    label: "Teacher",
    endpoint: Endpoint::Teacher,
    lookups: Some(Endpoint::StudentLookup),
    id_wire: "TeacherId",
    fields: &[
        FieldSpec::text("employeeNo", "EmployeeNo").required(),
        FieldSpec::text("firstName", "FirstName").required(),
        FieldSpec::text("lastName", "LastName"),
        FieldSpec::text("email", "Email").required(),
        FieldSpec::text("payScale", "PayScale"),
        FieldSpec::text("panNumber", "PanNumber"),
        FieldSpec::text("adharNumber", "AdharNumber"),
        FieldSpec::text("phoneNumber", "PhoneNumber").required(),
        FieldSpec::integer("designationId", "DesignationId").lookup("Designation"),
        FieldSpec::integer("departmentId", "DepartmentId").lookup("Department"),
        FieldSpec::integer("employmentType", "EmploymentType"),
        FieldSpec::text("fatherName", "FatherName"),
        FieldSpec::integer("country", "Country").lookup("country"),
        FieldSpec::integer("state", "State").lookup("state"),
        FieldSpec::text("adress", "Adress"),
        FieldSpec::integer("pincode", "Pincode"),
        FieldSpec::date("hireDate", "HireDate"),
        FieldSpec::flag("isActive", "IsActive").on_by_default(),
    ],
    filters: &[
        FilterSpec::column("name", &["FirstName", "LastName"]),
        FilterSpec::column("employeeNo", &["EmployeeNo"]),
        FilterSpec::column("phoneNumber", &["PhoneNumber"]),
        FilterSpec::column("email", &["Email"]),
    ],
    required_message: "Fill all required fields!",
    fetch_error: "Error fetching teachers.",
    toast_ttl: Duration::from_millis(2500),
    close_delay: Duration::from_millis(800),
};

pub static ALL: [&EntitySchema; 4] = [&FEES, &FEE_STRUCTURES, &STUDENTS, &TEACHERS];

pub fn by_screen(screen: &str) -> Option<&'static EntitySchema> {
    ALL.iter().copied().find(|s| s.screen == screen)
}
